// Rich-text core: content tree, HTML interchange, editing surface and smart merge

pub mod html_converter;
pub mod html_parser;
pub mod smart_merge;
pub mod structured_document;
pub mod structured_editor;
