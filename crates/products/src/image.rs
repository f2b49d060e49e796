use serde::{Deserialize, Serialize};

use catalog_core::{Entity, ImageId, ImageType};

/// Image attached to a product, filed under a type slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    id: ImageId,
    kind: ImageType,
    path: String,
}

impl ProductImage {
    pub fn new(kind: ImageType, path: impl Into<String>) -> Self {
        Self {
            id: ImageId::new(),
            kind,
            path: path.into(),
        }
    }

    pub fn id_typed(&self) -> ImageId {
        self.id
    }

    pub fn kind(&self) -> &ImageType {
        &self.kind
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn set_kind(&mut self, kind: ImageType) {
        self.kind = kind;
    }

    pub fn set_path(&mut self, path: impl Into<String>) {
        self.path = path.into();
    }
}

impl Entity for ProductImage {
    type Id = ImageId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
