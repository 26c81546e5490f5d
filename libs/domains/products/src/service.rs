//! Product business logic.

use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use tracing::instrument;
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::{CreateProduct, ImageUpload, Product, ProductResponse, UpdateProduct};
use crate::query::{Page, ProductQuery};
use crate::repository::ProductRepository;
use crate::upload::ImageUploader;

/// Largest accepted product image.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    uploader: Arc<dyn ImageUploader>,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: R, uploader: Arc<dyn ImageUploader>) -> Self {
        Self {
            repository: Arc::new(repository),
            uploader,
        }
    }

    /// Upload the image, then store the product with the returned URL.
    #[instrument(skip(self, input, image), fields(product_name = %input.name))]
    pub async fn create_product(
        &self,
        input: CreateProduct,
        image: ImageUpload,
    ) -> ProductResult<ProductResponse> {
        input.validate()?;
        check_image(&image)?;

        let image_url = self.uploader.upload_image(image).await?;
        let product = self.repository.create(Product::new(input, image_url)).await?;
        Ok(product.into())
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: ObjectId) -> ProductResult<ProductResponse> {
        self.repository
            .find_by_id(id)
            .await?
            .map(Into::into)
            .ok_or_else(|| ProductError::NotFound(id.to_hex()))
    }

    #[instrument(skip(self))]
    pub async fn list_products(&self, query: ProductQuery) -> ProductResult<Page<ProductResponse>> {
        query.validate()?;

        let (filter, sort, pagination) = query.into_parts();
        let (items, total) = self.repository.find_page(filter, sort, pagination).await?;

        Ok(Page {
            items,
            total,
            page: pagination.page,
            limit: pagination.limit,
        }
        .map(ProductResponse::from))
    }

    #[instrument(skip(self, input))]
    pub async fn update_product(
        &self,
        id: ObjectId,
        input: UpdateProduct,
    ) -> ProductResult<ProductResponse> {
        input.validate()?;
        if input.is_empty() {
            return Err(ProductError::Validation("No fields to update".to_string()));
        }

        self.repository
            .update(id, input)
            .await?
            .map(Into::into)
            .ok_or_else(|| ProductError::NotFound(id.to_hex()))
    }

    #[instrument(skip(self))]
    pub async fn delete_product(&self, id: ObjectId) -> ProductResult<()> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(ProductError::NotFound(id.to_hex()))
        }
    }
}

fn check_image(image: &ImageUpload) -> ProductResult<()> {
    if !image.content_type.starts_with("image/") {
        return Err(ProductError::Validation(format!(
            "Unsupported image type '{}'",
            image.content_type
        )));
    }
    if image.bytes.is_empty() {
        return Err(ProductError::Validation("Image is empty".to_string()));
    }
    if image.bytes.len() > MAX_IMAGE_BYTES {
        return Err(ProductError::Validation(format!(
            "Image exceeds {} bytes",
            MAX_IMAGE_BYTES
        )));
    }
    Ok(())
}
