//! Category and Tag Endpoints

use tracing::debug;

use nw_common::{Category, CategoryRequest, Paged, SortOrder, Tag, TagRequest};

use super::{page_query, ApiClient, Envelope};
use crate::error::ApiResult;

/// Pull a paged listing out of an envelope whose item field varies.
fn paged<T: serde::de::DeserializeOwned>(env: &Envelope, items: &str) -> ApiResult<Paged<T>> {
    Ok(Paged {
        items: env.optional_field(items)?.unwrap_or_default(),
        meta: env.optional_field("meta")?.unwrap_or_default(),
    })
}

impl ApiClient {
    // Categories

    pub async fn list_categories(
        &self,
        page: u32,
        limit: u32,
        order: SortOrder,
    ) -> ApiResult<Paged<Category>> {
        let env = self
            .get("/categories", &page_query(page, limit, order), "fetch categories")
            .await?;
        paged(&env, "data")
    }

    pub async fn search_categories(
        &self,
        search: &str,
        page: u32,
        limit: u32,
        order: SortOrder,
    ) -> ApiResult<Paged<Category>> {
        let mut query = page_query(page, limit, order);
        query.push(("search", search.to_string()));
        let env = self
            .get("/categories/search", &query, "search categories")
            .await?;
        paged(&env, "data")
    }

    pub async fn category_by_slug(&self, slug: &str) -> ApiResult<Category> {
        let env = self
            .get(&format!("/categories/view/{slug}"), &[], "fetch category")
            .await?;
        env.field("category")
    }

    pub async fn add_category(&self, request: &CategoryRequest) -> ApiResult<Option<String>> {
        debug!("Creating category '{}'", request.name);
        let env = self
            .post("/categories/add", &[], request, "save category")
            .await?;
        Ok(env.into_message())
    }

    /// Update a category; returns the new slug.
    pub async fn update_category(
        &self,
        category_id: i64,
        request: &CategoryRequest,
    ) -> ApiResult<Option<String>> {
        debug!("Updating category {}", category_id);
        let env = self
            .put(
                &format!("/categories/edit/{category_id}"),
                request,
                "save category",
            )
            .await?;
        env.optional_field("slug")
    }

    pub async fn delete_category(&self, category_id: i64) -> ApiResult<Option<String>> {
        debug!("Deleting category {}", category_id);
        let env = self
            .delete(
                &format!("/categories/delete/{category_id}"),
                "delete category",
            )
            .await?;
        Ok(env.into_message())
    }

    // Tags

    pub async fn list_tags(&self, page: u32, limit: u32, order: SortOrder) -> ApiResult<Paged<Tag>> {
        let env = self
            .get("/tags", &page_query(page, limit, order), "fetch tags")
            .await?;
        paged(&env, "tags")
    }

    pub async fn search_tags(
        &self,
        search: &str,
        page: u32,
        limit: u32,
        order: SortOrder,
    ) -> ApiResult<Paged<Tag>> {
        let mut query = page_query(page, limit, order);
        query.push(("search", search.to_string()));
        let env = self.get("/tags/search", &query, "search tags").await?;
        paged(&env, "data")
    }

    /// Fetch one tag by slug.
    ///
    /// The server returns the tag under the `category` key.
    pub async fn tag_by_slug(&self, slug: &str) -> ApiResult<Tag> {
        let env = self
            .get(&format!("/tags/view/{slug}"), &[], "fetch tag")
            .await?;
        env.field("category")
    }

    pub async fn add_tag(&self, request: &TagRequest) -> ApiResult<Option<String>> {
        debug!("Creating tag '{}'", request.name);
        let env = self.post("/tags/add", &[], request, "save tag").await?;
        Ok(env.into_message())
    }

    /// Update a tag; returns the new slug.
    pub async fn update_tag(&self, tag_id: i64, request: &TagRequest) -> ApiResult<Option<String>> {
        debug!("Updating tag {}", tag_id);
        let env = self
            .put(&format!("/tags/edit/{tag_id}"), request, "save tag")
            .await?;
        env.optional_field("slug")
    }

    pub async fn delete_tag(&self, tag_id: i64) -> ApiResult<Option<String>> {
        debug!("Deleting tag {}", tag_id);
        let env = self
            .delete(&format!("/tags/delete/{tag_id}"), "delete tag")
            .await?;
        Ok(env.into_message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paged_reads_named_item_field() {
        let env = Envelope::from_json(json!({
            "tags": [{ "id": 1, "name": "Banjir", "slug": "banjir" }],
            "meta": { "currentPage": 1, "itemsPerPage": 10, "totalItems": 1, "totalPages": 1 }
        }));
        let page: Paged<Tag> = paged(&env, "tags").unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.meta.total_items, 1);

        let empty: Paged<Tag> = paged(&Envelope::from_json(json!({})), "data").unwrap();
        assert!(empty.items.is_empty());
    }
}
