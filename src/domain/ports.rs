use crate::domain::model::{Coordinates, RegionTag, Store};
use crate::utils::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use futures_util::stream::BoxStream;

/// 供應商逐塊送來的音訊
pub type AudioStream = BoxStream<'static, Result<Bytes>>;

/// 反向地理編碼的結果；不可用時不視為錯誤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionLookup {
    Resolved(RegionTag),
    Unavailable,
}

impl RegionLookup {
    pub fn tag(&self) -> Option<RegionTag> {
        match self {
            RegionLookup::Resolved(tag) => Some(*tag),
            RegionLookup::Unavailable => None,
        }
    }
}

#[async_trait]
pub trait RegionResolver: Send + Sync {
    /// 任何失敗都必須吞掉並回傳 `Unavailable`
    async fn resolve(&self, coordinates: Coordinates) -> RegionLookup;
}

#[async_trait]
pub trait StoreLocator: Send + Sync {
    async fn nearby_stores(&self, coordinates: Coordinates) -> Result<Vec<Store>>;
    async fn geocode(&self, address: &str) -> Result<Coordinates>;
}

#[async_trait]
pub trait Narrator: Send + Sync {
    /// 供應商狀態確認成功後才回傳 audio/mpeg 串流
    async fn narrate(&self, text: &str) -> Result<AudioStream>;
}
