use crate::domain::model::{
    Category, GroceryItem, IngredientRef, MealTemplate, Nutrition, RegionTag, TemplateIngredient,
};
use crate::utils::error::{AppError, Result};
use std::collections::{HashMap, HashSet};

/// 不可變的參考資料：雜貨清單、食材對照與餐點範本
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Vec<GroceryItem>,
    ingredients: HashMap<String, IngredientRef>,
    templates: Vec<MealTemplate>,
}

impl Catalog {
    /// 建立並驗證目錄；任何範本引用不存在的食材 key 都會直接失敗
    pub fn new(items: Vec<GroceryItem>, templates: Vec<MealTemplate>) -> Result<Self> {
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(AppError::Catalog {
                    message: format!("duplicate grocery item id '{}'", item.id),
                });
            }
        }

        let ingredients: HashMap<String, IngredientRef> = items
            .iter()
            .map(|item| (item.id.clone(), IngredientRef::from(item)))
            .collect();

        for template in &templates {
            if template.base_servings == 0 {
                return Err(AppError::Catalog {
                    message: format!("meal '{}' has zero base servings", template.name),
                });
            }
            if template.ingredients.is_empty() {
                return Err(AppError::Catalog {
                    message: format!("meal '{}' has no ingredients", template.name),
                });
            }
            if let Some(missing) = template
                .ingredients
                .iter()
                .find(|i| !ingredients.contains_key(&i.key))
            {
                return Err(AppError::Catalog {
                    message: format!(
                        "meal '{}' references unknown ingredient '{}'",
                        template.name, missing.key
                    ),
                });
            }
            // 免爐具的餐點不能含需要烹煮的食材
            if !template.needs_stove {
                if let Some(cooked) = template
                    .ingredients
                    .iter()
                    .find(|i| ingredients.get(&i.key).is_some_and(|r| r.needs_stove))
                {
                    return Err(AppError::Catalog {
                        message: format!(
                            "no-stove meal '{}' uses stove-only ingredient '{}'",
                            template.name, cooked.key
                        ),
                    });
                }
            }
        }

        tracing::debug!(
            "Catalog loaded: {} grocery items, {} meal templates",
            items.len(),
            templates.len()
        );

        Ok(Self {
            items,
            ingredients,
            templates,
        })
    }

    pub fn builtin() -> Result<Self> {
        Self::new(grocery_items(), meal_templates())
    }

    pub fn items(&self) -> &[GroceryItem] {
        &self.items
    }

    pub fn templates(&self) -> &[MealTemplate] {
        &self.templates
    }

    pub fn ingredient(&self, key: &str) -> Option<&IngredientRef> {
        self.ingredients.get(key)
    }

    pub fn template(&self, name: &str) -> Option<&MealTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }
}

fn item(id: &str, name: &str, price: f64, category: Category, needs_stove: bool) -> GroceryItem {
    GroceryItem {
        id: id.to_string(),
        name: name.to_string(),
        price,
        category,
        needs_stove,
    }
}

fn ingredients(list: &[(&str, &str, f64)]) -> Vec<TemplateIngredient> {
    list.iter()
        .map(|(key, quantity, price)| TemplateIngredient {
            key: key.to_string(),
            quantity: quantity.to_string(),
            price: *price,
        })
        .collect()
}

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn nutrition(calories: u32, protein_g: u32, fat_g: u32, carbs_g: u32) -> Option<Nutrition> {
    Some(Nutrition {
        calories,
        protein_g,
        fat_g,
        carbs_g,
    })
}

pub fn grocery_items() -> Vec<GroceryItem> {
    use Category::*;

    vec![
        item("rice", "White Rice (2 lb bag)", 1.29, Grains, true),
        item("pasta", "Spaghetti (1 lb)", 1.20, Grains, true),
        item("bread", "Whole Wheat Bread", 2.49, Grains, false),
        item("oats", "Rolled Oats (18 oz)", 2.79, Grains, false),
        item("tortillas", "Flour Tortillas (10 ct)", 2.29, Grains, false),
        item("ramen", "Ramen Noodles (6 pack)", 1.98, Grains, true),
        item("black_beans", "Black Beans (15 oz can)", 0.89, Protein, false),
        item("lentils", "Red Lentils (1 lb)", 1.49, Protein, true),
        item("eggs", "Eggs (dozen)", 2.99, Protein, true),
        item("chicken_thighs", "Chicken Thighs (1.5 lb)", 4.49, Protein, true),
        item("tuna", "Canned Tuna (5 oz)", 1.09, Protein, false),
        item("peanut_butter", "Peanut Butter (16 oz)", 2.19, Protein, false),
        item("tofu", "Firm Tofu (14 oz)", 1.99, Protein, true),
        item("ground_turkey", "Ground Turkey (1 lb)", 3.99, Protein, true),
        item("cheese", "Cheddar Cheese (8 oz)", 2.29, Dairy, false),
        item("milk", "Milk (half gallon)", 2.09, Dairy, false),
        item("yogurt", "Plain Yogurt (32 oz)", 2.89, Dairy, false),
        item("onion", "Yellow Onion", 0.69, Produce, false),
        item("carrots", "Carrots (1 lb)", 0.99, Produce, false),
        item("bananas", "Bananas (bunch)", 1.29, Produce, false),
        item("apples", "Apples (3 lb bag)", 3.49, Produce, false),
        item("frozen_veg", "Frozen Mixed Vegetables (12 oz)", 1.19, Produce, true),
        item("potatoes", "Russet Potatoes (5 lb)", 3.29, Produce, true),
        item("spinach", "Spinach (10 oz)", 1.99, Produce, false),
        item("celery", "Celery", 1.49, Produce, false),
        item("cabbage", "Green Cabbage", 1.39, Produce, false),
        item("corn", "Sweet Corn (15 oz can)", 0.79, Produce, false),
        item("canned_tomatoes", "Diced Tomatoes (14.5 oz can)", 0.99, Pantry, false),
        item("cooking_oil", "Vegetable Oil (16 oz)", 2.49, Pantry, false),
        item("spices", "Spice Basics (cumin, garlic, chili)", 1.00, Pantry, false),
        item("curry_powder", "Curry Powder", 1.99, Pantry, false),
        item("soy_sauce", "Soy Sauce (10 oz)", 1.49, Pantry, false),
        item("salsa", "Salsa (16 oz)", 2.19, Pantry, false),
        item("mayo", "Mayonnaise (15 oz)", 2.49, Pantry, false),
    ]
}

pub fn meal_templates() -> Vec<MealTemplate> {
    vec![
        MealTemplate {
            name: "Rice & Black Beans".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("rice", "2 cups", 1.29),
                ("black_beans", "2 cans", 1.78),
                ("onion", "1 medium", 0.69),
                ("spices", "1 tsp cumin + garlic powder", 0.50),
                ("cooking_oil", "1 tbsp", 0.71),
            ]),
            instructions: strings(&[
                "Cook rice according to package directions.",
                "Saute diced onion in oil until soft, about 5 minutes.",
                "Add drained beans and spices; simmer 10 minutes.",
                "Serve beans over rice.",
            ]),
            nutrition_notes: "Complete protein from rice and beans; high in fiber and iron."
                .to_string(),
            nutrition: nutrition(1640, 64, 22, 300),
            allergens: vec![],
            needs_stove: true,
            region: Some(RegionTag::Southeast),
        },
        MealTemplate {
            name: "Chicken & Rice Bowl".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("chicken_thighs", "1.5 lb", 4.49),
                ("rice", "2 cups", 1.29),
                ("frozen_veg", "1 bag", 1.19),
                ("soy_sauce", "2 tbsp", 0.30),
            ]),
            instructions: strings(&[
                "Cook rice according to package directions.",
                "Cut chicken into bite-size pieces and brown in a hot pan, 8-10 minutes.",
                "Add frozen vegetables and soy sauce; cook until heated through.",
                "Serve over rice.",
            ]),
            nutrition_notes: "Lean protein with vegetables; a filling, balanced bowl.".to_string(),
            nutrition: nutrition(2200, 150, 70, 240),
            allergens: strings(&["Soy"]),
            needs_stove: true,
            region: None,
        },
        MealTemplate {
            name: "Tuna Salad Sandwiches".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("tuna", "2 cans", 2.18),
                ("mayo", "3 tbsp", 0.45),
                ("celery", "2 stalks", 0.40),
                ("bread", "8 slices", 1.25),
            ]),
            instructions: strings(&[
                "Drain tuna and flake into a bowl.",
                "Mix in mayonnaise and finely chopped celery.",
                "Spread onto bread and close sandwiches.",
            ]),
            nutrition_notes: "No cooking needed; omega-3s from tuna.".to_string(),
            nutrition: nutrition(1480, 96, 56, 150),
            allergens: strings(&["Fish", "Eggs", "Wheat", "Gluten"]),
            needs_stove: false,
            region: Some(RegionTag::Northeast),
        },
        MealTemplate {
            name: "Cheese & Apple Snack Plate".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("cheese", "8 oz block", 2.29),
                ("apples", "4 apples", 1.75),
                ("bread", "4 slices, toasted", 0.62),
            ]),
            instructions: strings(&[
                "Slice cheese into sticks or cubes.",
                "Core and slice apples.",
                "Cut bread into quarters and arrange everything on a plate.",
            ]),
            nutrition_notes: "Calcium and protein from cheese, fiber from apples.".to_string(),
            nutrition: nutrition(1500, 60, 72, 160),
            allergens: strings(&["Dairy", "Wheat", "Gluten"]),
            needs_stove: false,
            region: Some(RegionTag::Midwest),
        },
        MealTemplate {
            name: "Peanut Butter Banana Toast".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("bread", "8 slices", 1.25),
                ("peanut_butter", "1/2 cup", 0.70),
                ("bananas", "4 bananas", 1.00),
            ]),
            instructions: strings(&[
                "Spread peanut butter on each slice of bread.",
                "Top with sliced banana.",
            ]),
            nutrition_notes: "Quick energy with protein and potassium.".to_string(),
            nutrition: nutrition(1560, 52, 64, 210),
            allergens: strings(&["Peanuts", "Wheat", "Gluten"]),
            needs_stove: false,
            region: None,
        },
        MealTemplate {
            name: "Veggie Egg Fried Rice".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("rice", "2 cups", 1.29),
                ("eggs", "4 eggs", 1.00),
                ("frozen_veg", "1 bag", 1.19),
                ("soy_sauce", "2 tbsp", 0.30),
                ("cooking_oil", "1 tbsp", 0.71),
            ]),
            instructions: strings(&[
                "Cook rice and let it cool (day-old rice works best).",
                "Scramble eggs in oil, then push to the side of the pan.",
                "Add vegetables and rice; stir-fry 5 minutes.",
                "Season with soy sauce and toss everything together.",
            ]),
            nutrition_notes: "Eggs add protein; vegetables add vitamins A and C.".to_string(),
            nutrition: nutrition(1720, 56, 48, 270),
            allergens: strings(&["Eggs", "Soy"]),
            needs_stove: true,
            region: Some(RegionTag::Chinese),
        },
        MealTemplate {
            name: "Red Lentil Dal with Rice".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("lentils", "1 lb", 1.49),
                ("canned_tomatoes", "1 can", 0.99),
                ("onion", "1 medium", 0.69),
                ("curry_powder", "2 tbsp", 0.60),
                ("rice", "2 cups", 1.29),
            ]),
            instructions: strings(&[
                "Rinse lentils and simmer in 4 cups water for 20 minutes.",
                "Cook onion with curry powder until fragrant.",
                "Stir onion mixture and tomatoes into the lentils; simmer 10 minutes.",
                "Serve with rice.",
            ]),
            nutrition_notes: "Plant protein and folate; naturally allergen-light.".to_string(),
            nutrition: nutrition(1800, 90, 14, 330),
            allergens: vec![],
            needs_stove: true,
            region: Some(RegionTag::Indian),
        },
        MealTemplate {
            name: "Bean & Cheese Burritos".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("tortillas", "8 tortillas", 2.29),
                ("black_beans", "2 cans", 1.78),
                ("cheese", "1 cup shredded", 1.15),
                ("salsa", "1/2 jar", 1.10),
            ]),
            instructions: strings(&[
                "Drain and mash beans.",
                "Spread beans down the center of each tortilla.",
                "Top with cheese and salsa, then roll up.",
            ]),
            nutrition_notes: "Fiber-rich beans with calcium from cheese; no stove needed."
                .to_string(),
            nutrition: nutrition(2000, 84, 60, 280),
            allergens: strings(&["Dairy", "Wheat", "Gluten"]),
            needs_stove: false,
            region: Some(RegionTag::Mexican),
        },
        MealTemplate {
            name: "Spaghetti with Tomato Sauce".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("pasta", "1 lb", 1.20),
                ("canned_tomatoes", "2 cans", 1.98),
                ("onion", "1 medium", 0.69),
                ("spices", "garlic + Italian herbs", 0.50),
                ("cooking_oil", "1 tbsp", 0.71),
            ]),
            instructions: strings(&[
                "Boil pasta in salted water until al dente.",
                "Saute onion in oil, add tomatoes and herbs, simmer 15 minutes.",
                "Toss pasta with sauce.",
            ]),
            nutrition_notes: "Lycopene from tomatoes; add a side of greens if budget allows."
                .to_string(),
            nutrition: nutrition(1900, 60, 30, 350),
            allergens: strings(&["Wheat", "Gluten"]),
            needs_stove: true,
            region: None,
        },
        MealTemplate {
            name: "Turkey Chili".to_string(),
            base_servings: 6,
            ingredients: ingredients(&[
                ("ground_turkey", "1 lb", 3.99),
                ("black_beans", "2 cans", 1.78),
                ("canned_tomatoes", "2 cans", 1.98),
                ("onion", "1 medium", 0.69),
                ("spices", "2 tbsp chili powder", 0.75),
                ("corn", "1 can", 0.79),
            ]),
            instructions: strings(&[
                "Brown turkey with diced onion.",
                "Add beans, tomatoes, corn and chili powder.",
                "Simmer 25 minutes, stirring occasionally.",
            ]),
            nutrition_notes: "High protein, high fiber; leftovers freeze well.".to_string(),
            nutrition: nutrition(2300, 170, 60, 260),
            allergens: vec![],
            needs_stove: true,
            region: Some(RegionTag::Southwest),
        },
        MealTemplate {
            name: "Tofu Ramen Bowls".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("ramen", "4 packs", 1.32),
                ("tofu", "1 block", 1.99),
                ("spinach", "1/2 bag", 1.00),
                ("soy_sauce", "2 tbsp", 0.30),
                ("eggs", "4 eggs", 1.00),
            ]),
            instructions: strings(&[
                "Soft-boil eggs for 7 minutes, then peel.",
                "Cook noodles; use half the seasoning packets plus soy sauce.",
                "Add cubed tofu and spinach to the broth for the last 2 minutes.",
                "Top each bowl with a halved egg.",
            ]),
            nutrition_notes: "Using half the seasoning keeps sodium down; tofu adds protein."
                .to_string(),
            nutrition: nutrition(2000, 90, 80, 230),
            allergens: strings(&["Soy", "Wheat", "Gluten", "Eggs"]),
            needs_stove: true,
            region: Some(RegionTag::Japanese),
        },
        MealTemplate {
            name: "Oyakodon (Chicken & Egg Rice Bowl)".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("chicken_thighs", "1 lb", 3.00),
                ("eggs", "4 eggs", 1.00),
                ("onion", "1 medium", 0.69),
                ("rice", "2 cups", 1.29),
                ("soy_sauce", "3 tbsp", 0.30),
            ]),
            instructions: strings(&[
                "Cook rice.",
                "Simmer sliced onion and chicken in soy sauce with 1 cup water for 10 minutes.",
                "Pour beaten eggs over the top, cover and cook 2 minutes until just set.",
                "Slide over bowls of rice.",
            ]),
            nutrition_notes: "Protein from chicken and egg in one pan.".to_string(),
            nutrition: nutrition(2100, 130, 60, 250),
            allergens: strings(&["Eggs", "Soy"]),
            needs_stove: true,
            region: Some(RegionTag::Japanese),
        },
        MealTemplate {
            name: "Overnight Oats".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("oats", "2 cups", 0.93),
                ("milk", "2 cups", 0.52),
                ("yogurt", "1 cup", 0.72),
                ("bananas", "2 bananas", 0.50),
            ]),
            instructions: strings(&[
                "Stir oats, milk and yogurt together in a container.",
                "Refrigerate overnight.",
                "Top with sliced banana before serving.",
            ]),
            nutrition_notes: "Whole grains and calcium; no cooking required.".to_string(),
            nutrition: nutrition(1400, 56, 28, 230),
            allergens: strings(&["Dairy"]),
            needs_stove: false,
            region: None,
        },
        MealTemplate {
            name: "Loaded Baked Potatoes".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("potatoes", "4 large", 1.65),
                ("cheese", "1 cup shredded", 1.15),
                ("black_beans", "1 can", 0.89),
                ("yogurt", "1/2 cup", 0.36),
            ]),
            instructions: strings(&[
                "Bake potatoes at 400F for 50-60 minutes.",
                "Warm beans.",
                "Split potatoes and top with beans, cheese and a spoon of yogurt.",
            ]),
            nutrition_notes: "Potassium-rich potatoes with protein from beans.".to_string(),
            nutrition: nutrition(1700, 64, 44, 260),
            allergens: strings(&["Dairy"]),
            needs_stove: true,
            region: Some(RegionTag::Mountain),
        },
        MealTemplate {
            name: "Aloo Saag (Potato & Spinach Curry)".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("potatoes", "2 lb", 1.32),
                ("spinach", "1 bag", 1.99),
                ("onion", "1 medium", 0.69),
                ("curry_powder", "2 tbsp", 0.60),
                ("canned_tomatoes", "1 can", 0.99),
                ("rice", "2 cups", 1.29),
            ]),
            instructions: strings(&[
                "Cube potatoes and boil until just tender.",
                "Cook onion with curry powder, add tomatoes.",
                "Stir in potatoes and spinach; cook until spinach wilts.",
                "Serve with rice.",
            ]),
            nutrition_notes: "Iron and vitamin K from spinach; vegan.".to_string(),
            nutrition: None,
            allergens: vec![],
            needs_stove: true,
            region: Some(RegionTag::Indian),
        },
        MealTemplate {
            name: "Chicken Tinga Tacos".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("chicken_thighs", "1 lb", 3.00),
                ("tortillas", "8 tortillas", 2.29),
                ("salsa", "1/2 jar", 1.10),
                ("cabbage", "1/4 head, shredded", 0.35),
                ("onion", "1 medium", 0.69),
            ]),
            instructions: strings(&[
                "Simmer chicken with onion and salsa for 20 minutes.",
                "Shred chicken in the sauce.",
                "Warm tortillas and fill with chicken and cabbage.",
            ]),
            nutrition_notes: "Lean protein with crunchy cabbage for fiber.".to_string(),
            nutrition: nutrition(2100, 130, 70, 220),
            allergens: strings(&["Wheat", "Gluten"]),
            needs_stove: true,
            region: Some(RegionTag::Mexican),
        },
        MealTemplate {
            name: "California Veggie Wraps".to_string(),
            base_servings: 4,
            ingredients: ingredients(&[
                ("tortillas", "4 large tortillas", 2.29),
                ("carrots", "2 carrots, grated", 0.40),
                ("cabbage", "1/4 head, shredded", 0.35),
                ("spinach", "2 cups", 0.80),
                ("yogurt", "1/2 cup (dressing)", 0.36),
                ("black_beans", "1 can", 0.89),
            ]),
            instructions: strings(&[
                "Mash beans with a little yogurt for a spread.",
                "Layer spinach, carrots and cabbage on tortillas.",
                "Add the bean spread, roll tightly and slice in half.",
            ]),
            nutrition_notes: "Raw vegetables keep vitamins intact; no stove needed.".to_string(),
            nutrition: None,
            allergens: strings(&["Wheat", "Gluten", "Dairy"]),
            needs_stove: false,
            region: Some(RegionTag::WestCoast),
        },
    ]
}
