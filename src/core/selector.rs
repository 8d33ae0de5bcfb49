use crate::core::catalog::Catalog;
use crate::core::region::RegionPolicy;
use crate::domain::model::{
    from_cents, to_cents, MealPlan, MealTemplate, PlanRequest, PlannedIngredient, RegionTag,
};
use crate::utils::error::SelectionError;
use std::str::FromStr;

pub const DEFAULT_RESULT_LIMIT: usize = 8;
pub const COST_WEIGHT: f64 = 0.01;

/// 排名策略；舊版協定只回傳單一最佳餐點
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionStrategy {
    SingleBest,
    Ranked { limit: usize },
}

impl SelectionStrategy {
    pub fn ranked() -> Self {
        SelectionStrategy::Ranked {
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    pub fn mode_name(&self) -> &'static str {
        match self {
            SelectionStrategy::SingleBest => "single",
            SelectionStrategy::Ranked { .. } => "ranked",
        }
    }
}

impl Default for SelectionStrategy {
    fn default() -> Self {
        Self::ranked()
    }
}

impl FromStr for SelectionStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "single" | "single_best" | "legacy" => Ok(SelectionStrategy::SingleBest),
            "ranked" | "top_n" => Ok(SelectionStrategy::ranked()),
            other => Err(format!(
                "unknown selection mode '{}' (expected 'single' or 'ranked')",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Single(MealPlan),
    Ranked(Vec<MealPlan>),
}

impl Selection {
    pub fn plans(&self) -> &[MealPlan] {
        match self {
            Selection::Single(plan) => std::slice::from_ref(plan),
            Selection::Ranked(plans) => plans,
        }
    }

    pub fn into_plans(self) -> Vec<MealPlan> {
        match self {
            Selection::Single(plan) => vec![plan],
            Selection::Ranked(plans) => plans,
        }
    }
}

/// 通過所有硬性條件的範本
#[derive(Debug, Clone)]
pub struct Candidate<'a> {
    pub template: &'a MealTemplate,
    pub scale: u32,
    pub cost_cents: i64,
    pub preferred: bool,
}

impl Candidate<'_> {
    pub fn servings(&self) -> u32 {
        self.template.base_servings.saturating_mul(self.scale)
    }

    /// 舊版評分：份數越多越好，每人成本略微扣分
    pub fn legacy_score(&self) -> f64 {
        let servings = self.servings() as f64;
        let cost_per_person = from_cents(self.cost_cents) / servings;
        servings - cost_per_person * COST_WEIGHT
    }
}

pub fn scale_factor(headcount: u32, base_servings: u32) -> u32 {
    headcount.max(1).div_ceil(base_servings.max(1)).max(1)
}

/// 雙向、不分大小寫的子字串比對："nut" 命中 "Peanuts"，反之亦然
pub fn allergy_conflict(requested: &[String], allergens: &[String]) -> bool {
    allergens.iter().any(|allergen| {
        let allergen = allergen.to_lowercase();
        requested.iter().any(|tag| {
            let tag = tag.trim().to_lowercase();
            !tag.is_empty() && (allergen.contains(&tag) || tag.contains(&allergen))
        })
    })
}

/// 篩選並縮放，保留範本在目錄中的順序
pub fn candidates<'a>(
    request: &PlanRequest,
    catalog: &'a Catalog,
    policy: RegionPolicy,
) -> Vec<Candidate<'a>> {
    let budget_cents = request.budget_cents();

    catalog
        .templates()
        .iter()
        .filter(|t| request.has_stove || !t.needs_stove)
        .filter(|t| !allergy_conflict(&request.allergies, &t.allergens))
        .filter(|t| policy.permits(t.region))
        .filter_map(|t| {
            let scale = scale_factor(request.headcount, t.base_servings);
            let cost_cents = t.base_cost_cents() * i64::from(scale);
            if cost_cents > budget_cents {
                tracing::trace!("{} over budget after x{} scaling", t.name, scale);
                return None;
            }
            Some(Candidate {
                template: t,
                scale,
                cost_cents,
                preferred: policy.prefers(t.region),
            })
        })
        .collect()
}

pub fn select_meals(
    request: &PlanRequest,
    catalog: &Catalog,
    region: Option<RegionTag>,
    strategy: SelectionStrategy,
) -> Result<Selection, SelectionError> {
    let policy = RegionPolicy::for_region(region);
    let mut pool = candidates(request, catalog, policy);

    tracing::debug!(
        "{} candidates for ${:.2} / {} people (region: {:?}, mode: {})",
        pool.len(),
        request.budget,
        request.headcount,
        region,
        strategy.mode_name()
    );

    if pool.is_empty() {
        return Err(SelectionError::new(request.budget));
    }

    match strategy {
        SelectionStrategy::SingleBest => {
            let mut best = &pool[0];
            for candidate in &pool[1..] {
                if candidate.legacy_score() > best.legacy_score() {
                    best = candidate;
                }
            }
            Ok(Selection::Single(build_plan(best, catalog)))
        }
        SelectionStrategy::Ranked { limit } => {
            // sort_by_key 是穩定排序，同分時保留目錄順序
            pool.sort_by_key(|c| (!c.preferred, c.cost_cents));
            Ok(Selection::Ranked(
                pool.iter()
                    .take(limit.max(1))
                    .map(|c| build_plan(c, catalog))
                    .collect(),
            ))
        }
    }
}

fn build_plan(candidate: &Candidate<'_>, catalog: &Catalog) -> MealPlan {
    let template = candidate.template;
    let scale = candidate.scale;

    let ingredients = template
        .ingredients
        .iter()
        .map(|i| PlannedIngredient {
            // 目錄載入時已驗證所有 key 都存在
            name: catalog
                .ingredient(&i.key)
                .map(|r| r.name.clone())
                .unwrap_or_else(|| i.key.clone()),
            quantity: if scale > 1 {
                format!("{} (x{})", i.quantity, scale)
            } else {
                i.quantity.clone()
            },
            price: from_cents(to_cents(i.price) * i64::from(scale)),
        })
        .collect();

    MealPlan {
        meal_name: template.name.clone(),
        region: template.region,
        servings: candidate.servings(),
        scale,
        total_cost: from_cents(candidate.cost_cents),
        nutrition: template.nutrition.map(|n| n.scaled(scale)),
        ingredients,
        instructions: template.instructions.clone(),
        nutrition_notes: template.nutrition_notes.clone(),
        allergens: template.allergens.clone(),
        needs_stove: template.needs_stove,
    }
}
