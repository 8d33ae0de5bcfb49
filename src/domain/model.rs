use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 金額一律以整數「分」計算，避免浮點誤差
pub fn to_cents(dollars: f64) -> i64 {
    (dollars * 100.0).round() as i64
}

pub fn from_cents(cents: i64) -> f64 {
    cents as f64 / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Grains,
    Protein,
    Dairy,
    Produce,
    Pantry,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroceryItem {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub category: Category,
    pub needs_stove: bool,
}

/// 食材參照：由 key 解析出顯示名稱，並記錄是否需要爐具
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientRef {
    pub name: String,
    pub needs_stove: bool,
}

impl From<&GroceryItem> for IngredientRef {
    fn from(item: &GroceryItem) -> Self {
        Self {
            name: item.name.clone(),
            needs_stove: item.needs_stove,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TemplateIngredient {
    pub key: String,
    pub quantity: String,
    pub price: f64,
}

/// 營養數值為整份食譜（base_servings 人份）的總量，不是每人份
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nutrition {
    pub calories: u32,
    pub protein_g: u32,
    pub fat_g: u32,
    pub carbs_g: u32,
}

impl Nutrition {
    pub fn scaled(&self, factor: u32) -> Self {
        Self {
            calories: self.calories.saturating_mul(factor),
            protein_g: self.protein_g.saturating_mul(factor),
            fat_g: self.fat_g.saturating_mul(factor),
            carbs_g: self.carbs_g.saturating_mul(factor),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MealTemplate {
    pub name: String,
    pub base_servings: u32,
    pub ingredients: Vec<TemplateIngredient>,
    pub instructions: Vec<String>,
    pub nutrition_notes: String,
    pub nutrition: Option<Nutrition>,
    pub allergens: Vec<String>,
    pub needs_stove: bool,
    pub region: Option<RegionTag>,
}

impl MealTemplate {
    /// 未縮放的食材總價（分）
    pub fn base_cost_cents(&self) -> i64 {
        self.ingredients.iter().map(|i| to_cents(i.price)).sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionTag {
    Japanese,
    Indian,
    Chinese,
    Mexican,
    Southwest,
    Southeast,
    Northeast,
    Midwest,
    WestCoast,
    Mountain,
}

impl RegionTag {
    pub const ALL: [RegionTag; 10] = [
        RegionTag::Japanese,
        RegionTag::Indian,
        RegionTag::Chinese,
        RegionTag::Mexican,
        RegionTag::Southwest,
        RegionTag::Southeast,
        RegionTag::Northeast,
        RegionTag::Midwest,
        RegionTag::WestCoast,
        RegionTag::Mountain,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RegionTag::Japanese => "japanese",
            RegionTag::Indian => "indian",
            RegionTag::Chinese => "chinese",
            RegionTag::Mexican => "mexican",
            RegionTag::Southwest => "southwest",
            RegionTag::Southeast => "southeast",
            RegionTag::Northeast => "northeast",
            RegionTag::Midwest => "midwest",
            RegionTag::WestCoast => "west_coast",
            RegionTag::Mountain => "mountain",
        }
    }

    /// 國家層級的標籤會硬性限制候選餐點
    pub fn is_country_level(&self) -> bool {
        matches!(
            self,
            RegionTag::Japanese | RegionTag::Indian | RegionTag::Chinese | RegionTag::Mexican
        )
    }

    /// 此地區偏好的料理地區，第一個是自己
    pub fn preferred_regions(&self) -> &'static [RegionTag] {
        match self {
            RegionTag::Japanese => &[RegionTag::Japanese, RegionTag::Chinese],
            RegionTag::Chinese => &[RegionTag::Chinese, RegionTag::Japanese],
            RegionTag::Indian => &[RegionTag::Indian],
            RegionTag::Mexican => &[RegionTag::Mexican, RegionTag::Southwest],
            RegionTag::Southwest => &[RegionTag::Southwest, RegionTag::Mexican],
            RegionTag::Southeast => &[RegionTag::Southeast],
            RegionTag::Northeast => &[RegionTag::Northeast],
            RegionTag::Midwest => &[RegionTag::Midwest],
            RegionTag::WestCoast => &[RegionTag::WestCoast, RegionTag::Mexican, RegionTag::Japanese],
            RegionTag::Mountain => &[RegionTag::Mountain, RegionTag::Southwest],
        }
    }
}

impl fmt::Display for RegionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegionTag {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        RegionTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == normalized)
            .ok_or_else(|| format!("unknown region '{}'", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

/// 單次選餐請求，已完成輸入正規化
#[derive(Debug, Clone, PartialEq)]
pub struct PlanRequest {
    pub budget: f64,
    pub headcount: u32,
    pub allergies: Vec<String>,
    pub has_stove: bool,
    pub coordinates: Option<Coordinates>,
}

impl PlanRequest {
    pub fn new(budget: f64, headcount: u32) -> Self {
        Self {
            budget,
            headcount: headcount.max(1),
            allergies: Vec::new(),
            has_stove: true,
            coordinates: None,
        }
    }

    pub fn with_allergies<I, S>(mut self, allergies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allergies = allergies
            .into_iter()
            .map(Into::into)
            .map(|a: String| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .collect();
        self
    }

    pub fn with_stove(mut self, has_stove: bool) -> Self {
        self.has_stove = has_stove;
        self
    }

    pub fn with_coordinates(mut self, coordinates: Option<Coordinates>) -> Self {
        self.coordinates = coordinates;
        self
    }

    /// 預算轉為分，向下取整（加上極小值吸收浮點雜訊）
    pub fn budget_cents(&self) -> i64 {
        (self.budget * 100.0 + 1e-6).floor() as i64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedIngredient {
    pub name: String,
    pub quantity: String,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealPlan {
    pub meal_name: String,
    pub region: Option<RegionTag>,
    pub servings: u32,
    pub scale: u32,
    pub total_cost: f64,
    pub nutrition: Option<Nutrition>,
    pub ingredients: Vec<PlannedIngredient>,
    pub instructions: Vec<String>,
    pub nutrition_notes: String,
    pub allergens: Vec<String>,
    pub needs_stove: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Store {
    pub id: String,
    pub name: String,
    pub address: String,
    pub distance: String,
}
