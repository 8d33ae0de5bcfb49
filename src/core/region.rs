use crate::domain::model::{Coordinates, RegionTag};
use crate::domain::ports::{RegionLookup, RegionResolver};
use async_trait::async_trait;

/// 美國州代碼 → 料理地區，第一個為主要地區
pub fn state_regions(state_code: &str) -> Option<&'static [RegionTag]> {
    use RegionTag::*;

    let regions: &'static [RegionTag] = match state_code.trim().to_uppercase().as_str() {
        "CT" | "ME" | "MA" | "NH" | "RI" | "VT" | "NJ" | "NY" | "PA" | "DE" | "MD" | "DC" => {
            &[Northeast]
        }
        "VA" | "WV" | "NC" | "SC" | "GA" | "KY" | "TN" | "AL" | "MS" | "AR" => &[Southeast],
        "FL" | "LA" => &[Southeast, Mexican],
        "OH" | "IN" | "IL" | "MI" | "WI" | "MN" | "IA" | "MO" | "ND" | "SD" | "NE" | "KS" => {
            &[Midwest]
        }
        "TX" => &[Southwest, Mexican, Southeast],
        "NM" | "AZ" => &[Southwest, Mexican],
        "OK" => &[Southwest, Midwest],
        "CO" | "NV" => &[Mountain, Southwest],
        "UT" | "ID" | "MT" | "WY" => &[Mountain],
        "CA" => &[WestCoast, Mexican],
        "OR" | "WA" | "AK" => &[WestCoast],
        "HI" => &[WestCoast, Japanese],
        _ => return None,
    };
    Some(regions)
}

/// 四個國家直接對應固定的料理標籤
pub fn country_region(country_code: &str) -> Option<RegionTag> {
    match country_code.trim().to_uppercase().as_str() {
        "JP" => Some(RegionTag::Japanese),
        "IN" => Some(RegionTag::Indian),
        "CN" => Some(RegionTag::Chinese),
        "MX" => Some(RegionTag::Mexican),
        _ => None,
    }
}

/// 由國家與州代碼推得單一最佳地區
pub fn region_for(country_code: Option<&str>, state_code: Option<&str>) -> Option<RegionTag> {
    if let Some(tag) = country_code.and_then(country_region) {
        return Some(tag);
    }
    match country_code {
        Some(c) if c.eq_ignore_ascii_case("US") => state_code
            .and_then(state_regions)
            .and_then(|regions| regions.first().copied()),
        _ => None,
    }
}

/// 地區對選餐的影響：國家層級硬性限制，其餘只影響排序
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionPolicy {
    Unrestricted,
    Restrict(&'static [RegionTag]),
    Prefer(&'static [RegionTag]),
}

impl RegionPolicy {
    pub fn for_region(region: Option<RegionTag>) -> Self {
        match region {
            None => RegionPolicy::Unrestricted,
            Some(tag) if tag.is_country_level() => RegionPolicy::Restrict(tag.preferred_regions()),
            Some(tag) => RegionPolicy::Prefer(tag.preferred_regions()),
        }
    }

    pub fn permits(&self, region: Option<RegionTag>) -> bool {
        match self {
            RegionPolicy::Restrict(allowed) => region.is_some_and(|r| allowed.contains(&r)),
            _ => true,
        }
    }

    pub fn prefers(&self, region: Option<RegionTag>) -> bool {
        match self {
            RegionPolicy::Prefer(preferred) => region.is_some_and(|r| preferred.contains(&r)),
            _ => false,
        }
    }
}

/// 固定回傳同一地區，供測試與 CLI 注入
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedRegion(pub Option<RegionTag>);

#[async_trait]
impl RegionResolver for FixedRegion {
    async fn resolve(&self, _coordinates: Coordinates) -> RegionLookup {
        match self.0 {
            Some(tag) => RegionLookup::Resolved(tag),
            None => RegionLookup::Unavailable,
        }
    }
}
