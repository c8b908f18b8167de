use common_types::ItemCategory;

/// An image file received through a multipart form.
#[derive(Debug, Clone, Default)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// The trimmed value, or `None` when it is missing or blank.
#[must_use]
pub fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

/// Validates the image part shared by the report and search forms.
pub(crate) fn check_image<'a>(
    image: Option<&'a ImageUpload>,
    missing_message: &str,
) -> Result<&'a ImageUpload, String> {
    image
        .filter(|i| !i.file_name.trim().is_empty())
        .ok_or_else(|| missing_message.to_string())
}

pub(crate) fn parse_category(item_type: &str) -> Result<ItemCategory, String> {
    item_type
        .parse::<ItemCategory>()
        .map_err(|_| format!("Unknown item type '{item_type}'."))
}
