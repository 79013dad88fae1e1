use poem_openapi::Object;

use business::domain::menu::model::{DecodedMenu, MenuItem};

#[derive(Debug, Clone, Object)]
pub struct DecodeMenuRequest {
    /// Menu photo as a data URI (`data:image/jpeg;base64,...`) or bare base64
    pub image: Option<String>,
    /// Language dish names are translated into (default: English)
    pub language: Option<String>,
}

#[derive(Debug, Clone, Object)]
pub struct MenuItemResponse {
    /// Dish name
    pub dish: String,
    /// Price exactly as printed on the menu
    #[oai(skip_serializing_if_is_none)]
    pub price: Option<String>,
    #[oai(skip_serializing_if_is_none)]
    pub description: Option<String>,
    /// Image URL or data URI, null when no image was found
    pub image: Option<String>,
    /// Why no image could be produced for this dish
    #[oai(skip_serializing_if_is_none)]
    pub error: Option<String>,
}

impl From<MenuItem> for MenuItemResponse {
    fn from(item: MenuItem) -> Self {
        Self {
            dish: item.dish,
            price: item.price,
            description: item.description,
            image: item.image,
            error: item.error,
        }
    }
}

#[derive(Debug, Clone, Object)]
#[oai(rename_all = "camelCase")]
pub struct DecodedMenuResponse {
    /// Dishes in menu order, at most five
    pub results: Vec<MenuItemResponse>,
    /// First illustration error, set only when no dish got an image
    pub search_warning: Option<String>,
}

impl From<DecodedMenu> for DecodedMenuResponse {
    fn from(menu: DecodedMenu) -> Self {
        Self {
            results: menu.results.into_iter().map(|item| item.into()).collect(),
            search_warning: menu.search_warning,
        }
    }
}
