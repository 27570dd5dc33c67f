use serde::Deserialize;
use validator::Validate;

use crate::domain::document::NewDocument;
use crate::domain::types::DocumentTitle;
use crate::forms::{FormError, not_blank, optional};
use crate::resources::FileUpload;

#[derive(Debug, Default, Deserialize, Validate)]
/// Document upload dialog. `tags` is a comma separated list.
pub struct DocumentForm {
    #[validate(custom(function = "not_blank"))]
    pub title: String,
    #[serde(default)]
    pub folder: String,
    #[serde(default)]
    pub tags: String,
}

impl DocumentForm {
    pub fn tag_list(&self) -> Vec<String> {
        self.tags.split(',').filter_map(optional).collect()
    }

    /// Attaches the form metadata to `file` as individual multipart fields.
    pub fn into_upload(self, file: FileUpload) -> Result<FileUpload, FormError> {
        self.validate()?;
        let tags = self.tag_list();
        let title = DocumentTitle::new(self.title).map_err(FormError::field("title"))?;

        Ok(file
            .field("title", title)
            .field("folder", self.folder)
            .fields("tags", tags))
    }
}

impl TryFrom<DocumentForm> for NewDocument {
    type Error = FormError;

    fn try_from(form: DocumentForm) -> Result<Self, Self::Error> {
        form.validate()?;
        let tags = form.tag_list();
        Ok(NewDocument {
            title: DocumentTitle::new(form.title).map_err(FormError::field("title"))?,
            folder: optional(&form.folder),
            tags,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upload_carries_metadata_as_separate_fields() {
        let form = DocumentForm {
            title: "NDA".to_string(),
            folder: "legal".to_string(),
            tags: "signed, 2024 ,".to_string(),
        };

        let upload = form
            .into_upload(FileUpload::new("nda.pdf", b"%PDF".to_vec()))
            .unwrap();

        assert_eq!(
            upload.fields,
            vec![
                ("title".to_string(), "NDA".to_string()),
                ("folder".to_string(), "legal".to_string()),
                ("tags".to_string(), "signed".to_string()),
                ("tags".to_string(), "2024".to_string()),
            ]
        );
    }

    #[test]
    fn untitled_upload_is_rejected() {
        let form = DocumentForm::default();
        assert!(matches!(
            form.into_upload(FileUpload::new("a.txt", Vec::new())),
            Err(FormError::Validation(_))
        ));
    }
}
