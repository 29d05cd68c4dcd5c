// Employer career-site sources
pub mod binance;
pub mod bitget;
pub mod okx;

pub use binance::BinanceSource;
pub use bitget::BitgetSource;
pub use okx::OkxSource;
