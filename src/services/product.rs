//! Product service

use std::sync::Arc;

use super::ResourceClient;
use crate::client::Transport;
use crate::client::models::{
    ProductDetail, ProductDetailList, ProductFilters, ProductMatchList, ProductMatrix,
};
use crate::error::Result;

#[derive(Clone)]
pub struct ProductService {
    client: ResourceClient,
}

impl ProductService {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            client: ResourceClient::new(transport, "/products"),
        }
    }

    pub async fn get_details(&self, filters: &ProductFilters) -> Result<ProductDetailList> {
        self.client
            .post("details", &[], &filters.build_payload())
            .await
    }

    /// One product by code; `None` when the backend knows no such product
    pub async fn get_single_detail(&self, cod_pro: i64) -> Result<Option<ProductDetail>> {
        self.client
            .get(&format!("detail/{}", cod_pro), &[])
            .await
    }

    pub async fn get_matches(&self, filters: &ProductFilters) -> Result<ProductMatchList> {
        self.client
            .post("match", &[], &filters.build_payload())
            .await
    }

    pub async fn get_matrix(&self, filters: &ProductFilters) -> Result<ProductMatrix> {
        self.client
            .post("matrix", &[], &filters.build_payload())
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTransport;
    use serde_json::{Value, json};

    #[tokio::test]
    async fn test_single_detail_null_is_none() {
        let mock = MockTransport::new().with_get("/products/detail/5", Value::Null);
        let service = ProductService::new(Arc::new(mock));
        assert!(service.get_single_detail(5).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_single_detail_found() {
        let mock = MockTransport::new()
            .with_get("/products/detail/5", json!({"cod_pro": 5, "refint": "R5"}));
        let service = ProductService::new(Arc::new(mock));
        let detail = service.get_single_detail(5).await.unwrap().unwrap();
        assert_eq!(detail.refint.as_deref(), Some("R5"));
    }

    #[tokio::test]
    async fn test_each_endpoint_hits_its_path() {
        let mock = MockTransport::new()
            .with_post("/products/details", json!({"products": []}))
            .with_post("/products/match", json!({"matches": []}))
            .with_post("/products/matrix", json!({"cod_pro_list": [1, 2]}));
        let service = ProductService::new(Arc::new(mock.clone()));
        let filters = ProductFilters::for_cod_pro(1);

        service.get_details(&filters).await.unwrap();
        service.get_matches(&filters).await.unwrap();
        let matrix = service.get_matrix(&filters).await.unwrap();

        assert_eq!(matrix.cod_pro_list, vec![1, 2]);
        let paths: Vec<_> = mock.calls().await.into_iter().map(|c| c.path).collect();
        assert_eq!(
            paths,
            vec!["/products/details", "/products/match", "/products/matrix"]
        );
    }
}
