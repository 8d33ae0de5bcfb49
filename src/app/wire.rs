//! HTTP 請求與回應的 JSON 形狀（camelCase）

use crate::domain::model::{Coordinates, MealPlan, PlanRequest, RegionTag, Store};
use crate::utils::error::{AppError, Result};
use crate::utils::validation;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::OnceLock;

pub const MAX_NARRATION_CHARS: usize = 5000;

const INVALID_BUDGET: &str = "Please enter a valid budget amount.";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMealBody {
    pub budget: Option<Value>,
    pub people: Option<Value>,
    pub allergies: Option<Vec<String>>,
    pub has_stove: Option<bool>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub nearby_stores: Option<Vec<StoreRef>>,
    pub mode: Option<String>,
}

/// 前端可能送完整 Store 物件，也可能只送店名
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StoreRef {
    Name(String),
    Store(Store),
}

impl StoreRef {
    pub fn name(&self) -> &str {
        match self {
            StoreRef::Name(name) => name,
            StoreRef::Store(store) => &store.name,
        }
    }
}

fn non_numeric() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^0-9.]").expect("valid budget regex"))
}

/// 接受數字或 "$25.50" 這類字串
pub fn parse_budget(value: Option<&Value>) -> Result<f64> {
    let budget = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => non_numeric().replace_all(s, "").parse::<f64>().ok(),
        _ => None,
    };
    budget
        .ok_or_else(|| AppError::invalid_input(INVALID_BUDGET))
        .and_then(validation::validate_budget)
}

/// 缺少或無法解析時視為 1 人
pub fn parse_people(value: Option<&Value>) -> u32 {
    let people = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match people {
        Some(p) if p.is_finite() && p >= 1.0 => p.min(u32::MAX as f64).floor() as u32,
        _ => 1,
    }
}

impl PlanMealBody {
    /// 正規化成選餐請求；只給一半座標時忽略座標
    pub fn to_request(&self) -> Result<PlanRequest> {
        let budget = parse_budget(self.budget.as_ref())?;
        let headcount = parse_people(self.people.as_ref());

        let coordinates = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => {
                validation::validate_coordinates(lat, lng)?;
                Some(Coordinates::new(lat, lng))
            }
            _ => None,
        };

        Ok(PlanRequest::new(budget, headcount)
            .with_allergies(self.allergies.clone().unwrap_or_default())
            .with_stove(self.has_stove.unwrap_or(true))
            .with_coordinates(coordinates))
    }

    pub fn store_names(&self) -> Vec<String> {
        self.nearby_stores
            .iter()
            .flatten()
            .map(|s| s.name().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanMealResponse {
    pub mode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meal: Option<MealPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meals: Option<Vec<MealPlan>>,
    pub budget: f64,
    pub people: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<RegionTag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nearby_stores: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommended_store: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoordinateQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub address: Option<String>,
}

fn parse_coordinate(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// 座標優先；沒有座標時改用地址（需先地理編碼）
#[derive(Debug, Clone, PartialEq)]
pub enum StoreQuery {
    At(Coordinates),
    Address(String),
}

impl CoordinateQuery {
    pub fn to_query(&self) -> Result<StoreQuery> {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());

        if present(&self.lat) || present(&self.lng) {
            let lat = self.lat.as_deref().and_then(parse_coordinate);
            let lng = self.lng.as_deref().and_then(parse_coordinate);
            return match (lat, lng) {
                (Some(lat), Some(lng)) => {
                    validation::validate_coordinates(lat, lng)?;
                    Ok(StoreQuery::At(Coordinates::new(lat, lng)))
                }
                _ => Err(AppError::invalid_input("lat and lng must both be valid numbers.")),
            };
        }

        match self.address.as_deref().map(str::trim) {
            Some(address) if !address.is_empty() => Ok(StoreQuery::Address(address.to_string())),
            _ => Err(AppError::invalid_input("lat and lng are required.")),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeocodeQuery {
    pub address: Option<String>,
}

impl GeocodeQuery {
    pub fn address(&self) -> Result<&str> {
        self.address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| AppError::invalid_input("Please enter an address or ZIP code."))
    }
}

/// 朗讀文字：必須是字串，去除空白後不可為空，超過上限截斷
pub fn narration_text(body: &Value) -> Result<String> {
    let text = body
        .get("text")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::invalid_input("Text is required for narration."))?;

    Ok(text.chars().take(MAX_NARRATION_CHARS).collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
