use crate::adapters::elevenlabs::ElevenLabsNarrator;
use crate::adapters::google::GoogleMapsClient;
use crate::app::wire::{
    narration_text, CoordinateQuery, GeocodeQuery, HealthResponse, PlanMealBody, PlanMealResponse,
    StoreQuery,
};
use crate::config::AppConfig;
use crate::core::catalog::Catalog;
use crate::core::selector::{select_meals, Selection, SelectionStrategy};
use crate::domain::model::{Coordinates, GroceryItem, PlanRequest, RegionTag, Store};
use crate::domain::ports::{AudioStream, Narrator, RegionResolver, StoreLocator};
use crate::utils::error::{AppError, Result};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// 每個 HTTP 端點對應一個方法，不依賴任何 web 框架
#[derive(Clone)]
pub struct MealStretchService {
    catalog: Arc<Catalog>,
    regions: Arc<dyn RegionResolver>,
    stores: Arc<dyn StoreLocator>,
    narrator: Arc<dyn Narrator>,
    strategy: SelectionStrategy,
}

/// 選餐結果加上推論出的地區
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOutcome {
    pub selection: Selection,
    pub region: Option<RegionTag>,
}

impl MealStretchService {
    pub fn new(
        catalog: Arc<Catalog>,
        regions: Arc<dyn RegionResolver>,
        stores: Arc<dyn StoreLocator>,
        narrator: Arc<dyn Narrator>,
        strategy: SelectionStrategy,
    ) -> Self {
        Self {
            catalog,
            regions,
            stores,
            narrator,
            strategy,
        }
    }

    /// 依設定建立真實的供應商客戶端，共用同一個 reqwest Client
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let catalog = Arc::new(Catalog::builtin()?);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_seconds))
            .build()?;

        let google_key = config.google_api_key();
        let elevenlabs_key = config.elevenlabs_api_key();
        if google_key.is_none() {
            tracing::warn!("⚠️ GOOGLE_MAPS_API_KEY not set: region inference off, fallback stores in use");
        }
        if elevenlabs_key.is_none() {
            tracing::warn!("⚠️ ELEVENLABS_API_KEY not set: narration will return 503");
        }

        let maps = Arc::new(GoogleMapsClient::new(
            client.clone(),
            google_key,
            config.google.base_url.clone(),
        ));
        let narrator = Arc::new(
            ElevenLabsNarrator::new(client, elevenlabs_key, config.elevenlabs.base_url.clone())
                .with_voice(
                    config.elevenlabs.voice_id.clone(),
                    config.elevenlabs.model_id.clone(),
                ),
        );

        tracing::info!(
            "📦 Catalog loaded: {} items, {} meal templates",
            catalog.items().len(),
            catalog.templates().len()
        );

        Ok(Self::new(
            catalog,
            maps.clone(),
            maps,
            narrator,
            config.selection_strategy(),
        ))
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn strategy(&self) -> SelectionStrategy {
        self.strategy
    }

    pub fn health(&self) -> HealthResponse {
        HealthResponse {
            ok: true,
            message: "MealStretch API is running".to_string(),
        }
    }

    pub fn inventory(&self) -> Vec<GroceryItem> {
        self.catalog.items().to_vec()
    }

    /// 請求可用 "mode" 覆寫預設策略；排名模式沿用設定的筆數上限
    fn strategy_for(&self, mode: Option<&str>) -> Result<SelectionStrategy> {
        let Some(mode) = mode.map(str::trim).filter(|m| !m.is_empty()) else {
            return Ok(self.strategy);
        };
        let requested: SelectionStrategy = mode.parse().map_err(AppError::invalid_input)?;
        Ok(match (requested, self.strategy) {
            (SelectionStrategy::Ranked { .. }, SelectionStrategy::Ranked { limit }) => {
                SelectionStrategy::Ranked { limit }
            }
            (requested, _) => requested,
        })
    }

    /// 以已知地區直接選餐（CLI 與測試使用）
    pub fn plan_for_region(
        &self,
        request: &PlanRequest,
        region: Option<RegionTag>,
        strategy: SelectionStrategy,
    ) -> Result<PlanOutcome> {
        let selection = select_meals(request, &self.catalog, region, strategy)?;
        Ok(PlanOutcome { selection, region })
    }

    /// 有座標時先推論地區；推論失敗不影響選餐
    pub async fn plan(
        &self,
        request: &PlanRequest,
        strategy: SelectionStrategy,
    ) -> Result<PlanOutcome> {
        let region = match request.coordinates {
            Some(coordinates) => self.regions.resolve(coordinates).await.tag(),
            None => None,
        };
        self.plan_for_region(request, region, strategy)
    }

    pub async fn plan_meal(&self, body: PlanMealBody) -> Result<PlanMealResponse> {
        let request = body.to_request()?;
        let strategy = self.strategy_for(body.mode.as_deref())?;

        let outcome = self.plan(&request, strategy).await?;
        tracing::info!(
            "🍽️ Planned {} meal(s) for ${:.2} / {} people (region: {})",
            outcome.selection.plans().len(),
            request.budget,
            request.headcount,
            outcome.region.map(|r| r.as_str()).unwrap_or("unknown")
        );

        let store_names = body.store_names();
        let recommended_store = store_names.first().cloned();
        let nearby_stores = (!store_names.is_empty()).then_some(store_names);

        // meal 與 meals 只會出現其中一個
        let (meal, meals) = match outcome.selection {
            Selection::Single(plan) => (Some(plan), None),
            Selection::Ranked(plans) => (None, Some(plans)),
        };

        Ok(PlanMealResponse {
            mode: strategy.mode_name().to_string(),
            meal,
            meals,
            budget: request.budget,
            people: request.headcount,
            region: outcome.region,
            nearby_stores,
            recommended_store,
        })
    }

    pub async fn nearby_stores(&self, query: &CoordinateQuery) -> Result<Vec<Store>> {
        let coordinates = match query.to_query()? {
            StoreQuery::At(coordinates) => coordinates,
            StoreQuery::Address(address) => self.stores.geocode(&address).await?,
        };
        let stores = self.stores.nearby_stores(coordinates).await?;
        tracing::info!(
            "🏪 {} stores near ({:.4}, {:.4})",
            stores.len(),
            coordinates.lat,
            coordinates.lng
        );
        Ok(stores)
    }

    pub async fn geocode(&self, query: &GeocodeQuery) -> Result<Coordinates> {
        let address = query.address()?;
        self.stores.geocode(address).await
    }

    /// 空白或非字串的文字在呼叫供應商之前就拒絕
    pub async fn narrate(&self, body: &Value) -> Result<AudioStream> {
        let text = narration_text(body)?;
        let audio = self.narrator.narrate(&text).await?;
        tracing::info!("🔊 Streaming narration for {} chars", text.chars().count());
        Ok(audio)
    }
}
