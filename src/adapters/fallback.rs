use crate::domain::model::Store;

/// 未設定地圖供應商時回傳的固定店家清單
pub fn fallback_stores() -> Vec<Store> {
    [
        ("fallback-1", "Walmart Supercenter"),
        ("fallback-2", "Aldi"),
        ("fallback-3", "Kroger"),
    ]
    .into_iter()
    .map(|(id, name)| Store {
        id: id.to_string(),
        name: name.to_string(),
        address: "Search your area for the nearest location".to_string(),
        distance: "n/a".to_string(),
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_three_fallback_stores() {
        let stores = fallback_stores();
        assert_eq!(stores.len(), 3);
        assert!(stores.iter().all(|s| s.id.starts_with("fallback-")));
    }
}
