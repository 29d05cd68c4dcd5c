//! Fixed keyword vocabularies. All entries are lowercase; matching is a
//! case-insensitive substring test.

/// Lines containing one of these describe a posting's location.
pub const LOCATION_MARKERS: &[&str] = &[
    "hong kong", "singapore", "remote", "beijing", "shanghai", "shenzhen", "taipei", "tokyo",
];

pub const HONG_KONG_KEYWORDS: &[&str] = &["hong kong", "hongkong", "hk", "香港"];

pub const MAINLAND_CHINA_KEYWORDS: &[&str] = &[
    "beijing", "shanghai", "shenzhen", "guangzhou", "hangzhou",
    "chengdu", "nanjing", "wuhan", "xian", "suzhou", "tianjin",
    "chongqing", "dongguan", "foshan", "ningbo", "qingdao",
    "北京", "上海", "深圳", "广州", "杭州", "成都", "南京",
    "武汉", "西安", "苏州", "天津", "重庆", "东莞", "佛山",
    "宁波", "青岛", "mainland china", "china mainland", "中国大陆",
];

pub const GRADUATE_KEYWORDS: &[&str] = &[
    "graduate", "new grad", "new graduate", "fresh graduate",
    "entry level", "entry-level", "junior", "campus",
    "university", "intern to full", "graduate program",
    "应届", "校招", "毕业生", "实习转正", "管培",
];

pub fn contains_any(text: &str, keywords: &[&str]) -> bool {
    let lowered = text.to_lowercase();
    keywords.iter().any(|keyword| lowered.contains(keyword))
}
