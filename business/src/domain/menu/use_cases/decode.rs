use async_trait::async_trait;

use crate::domain::menu::errors::MenuError;
use crate::domain::menu::model::DecodedMenu;

pub struct DecodeMenuParams {
    pub image: Option<String>,
    pub language: Option<String>,
}

#[async_trait]
pub trait DecodeMenuUseCase: Send + Sync {
    async fn execute(&self, params: DecodeMenuParams) -> Result<DecodedMenu, MenuError>;
}
