use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use common_services::api::forms::ImageUpload;
use common_services::api::report::interfaces::ReportFoundForm;
use common_services::api::search::interfaces::SearchLostForm;
use tracing::debug;

/// The fields the report and search forms share, read from a multipart body.
#[derive(Debug, Default)]
pub struct ItemFormFields {
    pub item_image: Option<ImageUpload>,
    pub item_type: Option<String>,
    pub color: Option<String>,
    pub brand: Option<String>,
    pub location: Option<String>,
    pub contact_info: Option<String>,
}

pub async fn read_item_form(multipart: &mut Multipart) -> Result<ItemFormFields, MultipartError> {
    let mut fields = ItemFormFields::default();
    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };
        match name.as_str() {
            "item_image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?;
                fields.item_image = Some(ImageUpload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            "item_type" => fields.item_type = Some(field.text().await?),
            "color" => fields.color = Some(field.text().await?),
            "brand" => fields.brand = Some(field.text().await?),
            "location" => fields.location = Some(field.text().await?),
            "contact_info" => fields.contact_info = Some(field.text().await?),
            other => debug!("Ignoring unknown form field '{other}'"),
        }
    }
    Ok(fields)
}

impl From<ItemFormFields> for ReportFoundForm {
    fn from(fields: ItemFormFields) -> Self {
        Self {
            item_image: fields.item_image,
            item_type: fields.item_type,
            color: fields.color,
            brand: fields.brand,
            location: fields.location,
            contact_info: fields.contact_info,
        }
    }
}

impl From<ItemFormFields> for SearchLostForm {
    fn from(fields: ItemFormFields) -> Self {
        Self {
            item_image: fields.item_image,
            item_type: fields.item_type,
            color: fields.color,
            brand: fields.brand,
            location: fields.location,
        }
    }
}
