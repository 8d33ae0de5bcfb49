use mealstretch::core::region::RegionPolicy;
use mealstretch::core::selector::{allergy_conflict, candidates, select_meals};
use mealstretch::domain::model::to_cents;
use mealstretch::{Catalog, PlanRequest, RegionTag, Selection, SelectionStrategy};

const BUDGETS: [f64; 9] = [0.5, 2.67, 3.0, 5.0, 7.5, 10.0, 15.0, 25.0, 60.0];
const HEADCOUNTS: [u32; 7] = [1, 2, 3, 4, 5, 8, 13];

fn allergy_sets() -> Vec<Vec<String>> {
    [
        vec![],
        vec!["Dairy"],
        vec!["peanut"],
        vec!["Gluten", "egg"],
        vec!["fish", "soy", "Shellfish"],
    ]
    .into_iter()
    .map(|set| set.into_iter().map(String::from).collect())
    .collect()
}

fn regions() -> Vec<Option<RegionTag>> {
    std::iter::once(None)
        .chain(RegionTag::ALL.iter().copied().map(Some))
        .collect()
}

/// 走訪所有預算、人數、過敏組合、爐具與地區的組合
fn sweep<F: FnMut(&PlanRequest, Option<RegionTag>)>(mut check: F) {
    for budget in BUDGETS {
        for headcount in HEADCOUNTS {
            for allergies in allergy_sets() {
                for has_stove in [true, false] {
                    for region in regions() {
                        let request = PlanRequest::new(budget, headcount)
                            .with_allergies(allergies.clone())
                            .with_stove(has_stove);
                        check(&request, region);
                    }
                }
            }
        }
    }
}

fn strategies() -> [SelectionStrategy; 3] {
    [
        SelectionStrategy::SingleBest,
        SelectionStrategy::ranked(),
        SelectionStrategy::Ranked { limit: 2 },
    ]
}

#[test]
fn every_plan_satisfies_hard_constraints() {
    let catalog = Catalog::builtin().unwrap();

    sweep(|request, region| {
        for strategy in strategies() {
            let Ok(selection) = select_meals(request, &catalog, region, strategy) else {
                continue;
            };
            for plan in selection.plans() {
                assert!(
                    to_cents(plan.total_cost) <= request.budget_cents(),
                    "{} costs {} over budget {}",
                    plan.meal_name,
                    plan.total_cost,
                    request.budget
                );
                assert!(plan.servings >= request.headcount);
                assert!(request.has_stove || !plan.needs_stove);
                assert!(!allergy_conflict(&request.allergies, &plan.allergens));
                if let Some(tag) = region.filter(|t| t.is_country_level()) {
                    let plan_region = plan.region.expect("restricted plans carry a region");
                    assert!(tag.preferred_regions().contains(&plan_region));
                }
            }
        }
    });
}

#[test]
fn error_only_when_no_candidate_survives() {
    let catalog = Catalog::builtin().unwrap();

    sweep(|request, region| {
        let pool = candidates(request, &catalog, RegionPolicy::for_region(region));
        for strategy in strategies() {
            let result = select_meals(request, &catalog, region, strategy);
            assert_eq!(pool.is_empty(), result.is_err());
            if let Err(e) = result {
                assert_eq!(e.budget, request.budget);
                assert!(!e.hint.is_empty());
            }
        }
    });
}

#[test]
fn ranked_is_preferred_first_then_cheapest() {
    let catalog = Catalog::builtin().unwrap();

    sweep(|request, region| {
        let policy = RegionPolicy::for_region(region);
        let pool = candidates(request, &catalog, policy);
        let Ok(Selection::Ranked(plans)) =
            select_meals(request, &catalog, region, SelectionStrategy::ranked())
        else {
            return;
        };

        assert_eq!(plans.len(), pool.len().min(8));
        let keys: Vec<(bool, i64)> = plans
            .iter()
            .map(|p| (!policy.prefers(p.region), to_cents(p.total_cost)))
            .collect();
        assert!(keys.windows(2).all(|w| w[0] <= w[1]), "{:?}", keys);
    });
}

#[test]
fn single_best_maximizes_legacy_score() {
    let catalog = Catalog::builtin().unwrap();

    sweep(|request, region| {
        let pool = candidates(request, &catalog, RegionPolicy::for_region(region));
        let Ok(Selection::Single(plan)) =
            select_meals(request, &catalog, region, SelectionStrategy::SingleBest)
        else {
            return;
        };

        let best = pool
            .iter()
            .map(|c| c.legacy_score())
            .fold(f64::NEG_INFINITY, f64::max);
        let chosen = pool
            .iter()
            .find(|c| c.template.name == plan.meal_name)
            .expect("single pick comes from the candidate pool");
        assert_eq!(chosen.legacy_score(), best);
    });
}

#[test]
fn headcount_equal_to_base_servings_is_unscaled() {
    let catalog = Catalog::builtin().unwrap();

    for template in catalog.templates() {
        let request = PlanRequest::new(1_000.0, template.base_servings);
        let unit_sum: i64 = template.ingredients.iter().map(|i| to_cents(i.price)).sum();

        let pool = candidates(&request, &catalog, RegionPolicy::Unrestricted);
        let candidate = pool
            .iter()
            .find(|c| c.template.name == template.name)
            .unwrap_or_else(|| panic!("{} should fit a large budget", template.name));
        assert_eq!(candidate.scale, 1, "{}", template.name);
        assert_eq!(candidate.cost_cents, unit_sum, "{}", template.name);
        assert_eq!(candidate.cost_cents, template.base_cost_cents());

        let selection = select_meals(
            &request,
            &catalog,
            None,
            SelectionStrategy::Ranked { limit: usize::MAX },
        )
        .unwrap();
        let plan = selection
            .plans()
            .iter()
            .find(|p| p.meal_name == template.name)
            .unwrap();
        assert_eq!(plan.servings, template.base_servings);
        assert_eq!(to_cents(plan.total_cost), unit_sum);
        for (planned, base) in plan.ingredients.iter().zip(&template.ingredients) {
            assert_eq!(to_cents(planned.price), to_cents(base.price));
        }
    }
}

#[test]
fn identical_requests_select_identically() {
    let catalog = Catalog::builtin().unwrap();

    sweep(|request, region| {
        for strategy in strategies() {
            let first = select_meals(request, &catalog, region, strategy);
            let second = select_meals(request, &catalog, region, strategy);
            assert_eq!(first, second, "{:?} {:?}", strategy, region);
        }
    });
}

#[test]
fn scenario_a_rice_and_beans_is_a_candidate() {
    let catalog = Catalog::builtin().unwrap();
    let request = PlanRequest::new(15.0, 4).with_stove(true);

    let pool = candidates(&request, &catalog, RegionPolicy::Unrestricted);
    let rice = pool
        .iter()
        .find(|c| c.template.name == "Rice & Black Beans")
        .expect("Rice & Black Beans should survive filtering");
    assert_eq!(rice.scale, 1);
    assert_eq!(rice.cost_cents, 497);

    let selection = select_meals(&request, &catalog, None, SelectionStrategy::ranked()).unwrap();
    assert!(selection
        .plans()
        .iter()
        .any(|p| p.meal_name == "Rice & Black Beans"));
}

#[test]
fn scenario_b_dairy_allergy() {
    let catalog = Catalog::builtin().unwrap();
    let request = PlanRequest::new(15.0, 4).with_allergies(["Dairy"]);

    for strategy in strategies() {
        let selection = select_meals(&request, &catalog, None, strategy).unwrap();
        assert!(selection
            .plans()
            .iter()
            .all(|p| p.meal_name != "Cheese & Apple Snack Plate"));
    }
}

#[test]
fn scenario_c_scaling_exceeds_budget() {
    let catalog = Catalog::builtin().unwrap();
    let request = PlanRequest::new(5.0, 8);

    let pool = candidates(&request, &catalog, RegionPolicy::Unrestricted);
    assert!(pool.iter().all(|c| c.template.name != "Rice & Black Beans"));

    for strategy in strategies() {
        let err = select_meals(&request, &catalog, None, strategy).unwrap_err();
        assert_eq!(err.budget, 5.0);
    }
}

#[test]
fn scenario_d_no_stove() {
    let catalog = Catalog::builtin().unwrap();
    let request = PlanRequest::new(15.0, 4).with_stove(false);

    let pool = candidates(&request, &catalog, RegionPolicy::Unrestricted);
    assert!(pool.iter().any(|c| c.template.name == "Tuna Salad Sandwiches"));
    assert!(pool.iter().all(|c| c.template.name != "Chicken & Rice Bowl"));
}
