pub mod client;
pub mod credentials;
pub mod gemini;
pub mod image_generator;
pub mod menu_extractor;
pub mod placeholder;
pub mod search_illustrator;
pub mod vision_ocr;

#[cfg(test)]
mod test_support;
