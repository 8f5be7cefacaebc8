//! Catalog service - products, their images, and categories.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::MEDIA_FOLDER_PRODUCTS;
use crate::domain::{
    slugify, Category, NewProduct, Product, ProductFilter, ProductPatch, Requester,
};
use crate::errors::{AppError, AppResult, OptionExt};
use crate::infra::media::{self, MediaStore};
use crate::infra::UnitOfWork;
use crate::types::PaginationParams;

#[async_trait]
pub trait CatalogService: Send + Sync {
    async fn list_products(
        &self,
        filter: &ProductFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)>;

    async fn get_product(&self, id: Uuid) -> AppResult<Product>;

    async fn create_product(&self, requester: Requester, input: NewProduct) -> AppResult<Product>;

    async fn update_product(
        &self,
        requester: Requester,
        id: Uuid,
        patch: ProductPatch,
    ) -> AppResult<Product>;

    /// Delete a product and, best-effort, its images.
    async fn delete_product(&self, requester: Requester, id: Uuid) -> AppResult<()>;

    async fn add_product_image(
        &self,
        requester: Requester,
        id: Uuid,
        bytes: Vec<u8>,
        file_name: String,
    ) -> AppResult<Product>;

    async fn remove_product_image(
        &self,
        requester: Requester,
        id: Uuid,
        public_id: &str,
    ) -> AppResult<Product>;

    async fn list_categories(&self) -> AppResult<Vec<Category>>;

    async fn get_category(&self, id: Uuid) -> AppResult<Category>;

    async fn create_category(
        &self,
        requester: Requester,
        name: String,
        description: Option<String>,
    ) -> AppResult<Category>;

    async fn update_category(
        &self,
        requester: Requester,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> AppResult<Category>;

    async fn delete_category(&self, requester: Requester, id: Uuid) -> AppResult<()>;
}

pub struct CatalogManager<U: UnitOfWork> {
    uow: Arc<U>,
    media: Arc<dyn MediaStore>,
}

impl<U: UnitOfWork> CatalogManager<U> {
    pub fn new(uow: Arc<U>, media: Arc<dyn MediaStore>) -> Self {
        Self { uow, media }
    }

    async fn load_product(&self, id: Uuid) -> AppResult<Product> {
        self.uow
            .products()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Product")
    }

    async fn load_category(&self, id: Uuid) -> AppResult<Category> {
        self.uow
            .categories()
            .find_by_id(id)
            .await?
            .ok_or_not_found("Category")
    }

    async fn ensure_category(&self, id: Option<Uuid>) -> AppResult<()> {
        match id {
            Some(id) => self.load_category(id).await.map(|_| ()),
            None => Ok(()),
        }
    }

    /// Reject a slug already used by another category.
    async fn ensure_slug_free(&self, slug: &str, owner: Option<Uuid>) -> AppResult<()> {
        match self.uow.categories().find_by_slug(slug).await? {
            Some(existing) if Some(existing.id) != owner => Err(AppError::conflict("Category")),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> CatalogService for CatalogManager<U> {
    async fn list_products(
        &self,
        filter: &ProductFilter,
        params: &PaginationParams,
    ) -> AppResult<(Vec<Product>, u64)> {
        self.uow.products().list(filter, params).await
    }

    async fn get_product(&self, id: Uuid) -> AppResult<Product> {
        self.load_product(id).await
    }

    #[instrument(skip(self, input))]
    async fn create_product(&self, requester: Requester, input: NewProduct) -> AppResult<Product> {
        requester.require_admin()?;
        self.ensure_category(input.category_id).await?;

        let product = Product::new(input)?;
        self.uow.products().save(&product).await?;
        info!(product_id = %product.id, "Product created");
        Ok(product)
    }

    #[instrument(skip(self, patch))]
    async fn update_product(
        &self,
        requester: Requester,
        id: Uuid,
        patch: ProductPatch,
    ) -> AppResult<Product> {
        requester.require_admin()?;
        let mut product = self.load_product(id).await?;
        self.ensure_category(patch.category_id).await?;

        product.apply(patch)?;
        self.uow.products().save(&product).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn delete_product(&self, requester: Requester, id: Uuid) -> AppResult<()> {
        requester.require_admin()?;
        let product = self.load_product(id).await?;
        self.uow.products().delete(id).await?;

        for image in &product.images {
            media::release(self.media.as_ref(), image).await;
        }
        info!(product_id = %id, "Product deleted");
        Ok(())
    }

    #[instrument(skip(self, bytes))]
    async fn add_product_image(
        &self,
        requester: Requester,
        id: Uuid,
        bytes: Vec<u8>,
        file_name: String,
    ) -> AppResult<Product> {
        requester.require_admin()?;
        let mut product = self.load_product(id).await?;

        let image = self
            .media
            .upload(bytes, MEDIA_FOLDER_PRODUCTS, &file_name)
            .await?;
        product.add_image(image);
        self.uow.products().save(&product).await?;
        Ok(product)
    }

    #[instrument(skip(self))]
    async fn remove_product_image(
        &self,
        requester: Requester,
        id: Uuid,
        public_id: &str,
    ) -> AppResult<Product> {
        requester.require_admin()?;
        let mut product = self.load_product(id).await?;

        let image = product.remove_image(public_id)?;
        self.uow.products().save(&product).await?;
        media::release(self.media.as_ref(), &image).await;
        Ok(product)
    }

    async fn list_categories(&self) -> AppResult<Vec<Category>> {
        self.uow.categories().list().await
    }

    async fn get_category(&self, id: Uuid) -> AppResult<Category> {
        self.load_category(id).await
    }

    #[instrument(skip(self, description))]
    async fn create_category(
        &self,
        requester: Requester,
        name: String,
        description: Option<String>,
    ) -> AppResult<Category> {
        requester.require_admin()?;
        let category = Category::new(name, description)?;
        self.ensure_slug_free(&category.slug, None).await?;

        self.uow.categories().save(&category).await?;
        info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    #[instrument(skip(self, description))]
    async fn update_category(
        &self,
        requester: Requester,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> AppResult<Category> {
        requester.require_admin()?;
        let mut category = self.load_category(id).await?;

        if let Some(name) = name {
            self.ensure_slug_free(&slugify(&name), Some(id)).await?;
            category.rename(name)?;
        }
        if description.is_some() {
            category.description = description;
        }
        self.uow.categories().save(&category).await?;
        Ok(category)
    }

    #[instrument(skip(self))]
    async fn delete_category(&self, requester: Requester, id: Uuid) -> AppResult<()> {
        requester.require_admin()?;
        let category = self.load_category(id).await?;
        self.uow.categories().delete(id).await?;

        if let Some(image) = &category.image {
            media::release(self.media.as_ref(), image).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MediaAsset, Role};
    use crate::infra::MockMediaStore;
    use crate::services::testing::{product, TestUnitOfWork};
    use rust_decimal_macros::dec;

    fn admin() -> Requester {
        Requester::new(Uuid::new_v4(), Role::Admin)
    }

    fn no_media() -> Arc<dyn MediaStore> {
        Arc::new(MockMediaStore::new())
    }

    #[tokio::test]
    async fn test_create_product_requires_admin() {
        let service = CatalogManager::new(TestUnitOfWork::default().build(), no_media());
        let err = service
            .create_product(
                Requester::new(Uuid::new_v4(), Role::User),
                NewProduct {
                    name: "Kettle".into(),
                    description: String::new(),
                    price: dec!(20),
                    category_id: None,
                    stock: 1,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden));
    }

    #[tokio::test]
    async fn test_create_product_with_unknown_category_fails() {
        let mut uow = TestUnitOfWork::default();
        uow.categories.expect_find_by_id().returning(|_| Ok(None));
        uow.products.expect_save().never();

        let service = CatalogManager::new(uow.build(), no_media());
        let err = service
            .create_product(
                admin(),
                NewProduct {
                    name: "Kettle".into(),
                    description: String::new(),
                    price: dec!(20),
                    category_id: Some(Uuid::new_v4()),
                    stock: 1,
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_taken_slug_conflicts() {
        let mut uow = TestUnitOfWork::default();
        uow.categories
            .expect_find_by_slug()
            .withf(|slug| slug == "home-appliances")
            .returning(|_| Ok(Some(Category::new("Home Appliances".into(), None).unwrap())));
        uow.categories.expect_save().never();

        let service = CatalogManager::new(uow.build(), no_media());
        let err = service
            .create_category(admin(), "home appliances!".into(), None)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_renaming_category_to_own_slug_is_allowed() {
        let category = Category::new("Lighting".into(), None).unwrap();
        let id = category.id;
        let same = category.clone();

        let mut uow = TestUnitOfWork::default();
        uow.categories
            .expect_find_by_id()
            .returning(move |_| Ok(Some(category.clone())));
        uow.categories
            .expect_find_by_slug()
            .returning(move |_| Ok(Some(same.clone())));
        uow.categories.expect_save().times(1).returning(|_| Ok(()));

        let service = CatalogManager::new(uow.build(), no_media());
        let updated = service
            .update_category(admin(), id, Some("LIGHTING".into()), None)
            .await
            .unwrap();

        assert_eq!(updated.slug, "lighting");
        assert_eq!(updated.name, "LIGHTING");
    }

    #[tokio::test]
    async fn test_delete_product_releases_images() {
        let lamp = product(dec!(10));
        let id = lamp.id;
        let public_id = lamp.images[0].public_id.clone();

        let mut uow = TestUnitOfWork::default();
        uow.products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(lamp.clone())));
        uow.products.expect_delete().times(1).returning(|_| Ok(()));

        let mut media = MockMediaStore::new();
        media
            .expect_delete()
            .withf(move |p| p == public_id)
            .times(1)
            .returning(|_| Ok(()));

        let service = CatalogManager::new(uow.build(), Arc::new(media));
        service.delete_product(admin(), id).await.unwrap();
    }

    #[tokio::test]
    async fn test_add_image_appends_upload() {
        let lamp = product(dec!(10));
        let id = lamp.id;

        let mut uow = TestUnitOfWork::default();
        uow.products
            .expect_find_by_id()
            .returning(move |_| Ok(Some(lamp.clone())));
        uow.products
            .expect_save()
            .withf(|p| p.images.len() == 2)
            .times(1)
            .returning(|_| Ok(()));

        let mut media = MockMediaStore::new();
        media
            .expect_upload()
            .withf(|_, folder, _| folder == MEDIA_FOLDER_PRODUCTS)
            .returning(|_, _, _| {
                Ok(MediaAsset {
                    public_id: "storefront/products/side".into(),
                    url: "https://cdn.example.com/side.jpg".into(),
                })
            });

        let service = CatalogManager::new(uow.build(), Arc::new(media));
        let updated = service
            .add_product_image(admin(), id, vec![0xFF, 0xD8], "side.jpg".into())
            .await
            .unwrap();

        assert_eq!(updated.images[1].url, "https://cdn.example.com/side.jpg");
    }
}
