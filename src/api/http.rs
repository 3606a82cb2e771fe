use super::{Backend, Envelope};
use crate::domain::{Order, OrderCreate, OrderId, OrderUpdate, Product, ProductCreate, ProductId};
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Backend reached over HTTP, e.g. `http://localhost:8080`.
#[derive(Clone)]
pub struct HttpBackend {
    http: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url))
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "Backend returned an error status");
        Err(ApiError::Status { status: status.as_u16(), body })
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, ApiError> {
        let response = self.send(self.http.get(self.url(path))).await?;
        let envelope: Envelope<T> = response.json().await?;
        envelope.into_data()
    }
}

fn product_form(product: ProductCreate) -> Result<Form, ApiError> {
    let mut form = Form::new()
        .text("name", product.name)
        .text("price", product.price.to_string())
        .text("status", product.active.to_string())
        .text("stock", product.stock.to_string())
        .text("creby", product.creby)
        .text("cretime", product.cretime.to_rfc3339());

    if let Some(image) = product.image {
        let mime = image.content_type().unwrap_or("application/octet-stream");
        let part = Part::bytes(image.bytes)
            .file_name(image.file_name)
            .mime_str(mime)?;
        form = form.part("image", part);
    }
    Ok(form)
}

#[async_trait]
impl Backend for HttpBackend {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        debug!("Sending request");
        Ok(self.fetch::<Vec<Product>>("products").await?.unwrap_or_default())
    }

    #[instrument(fields(product_name = %product.name), skip(self, product))]
    async fn create_product(&self, product: ProductCreate) -> Result<(), ApiError> {
        debug!("Sending request");
        let form = product_form(product)?;
        self.send(self.http.post(self.url("products/create")).multipart(form)).await?;
        Ok(())
    }

    #[instrument(fields(product_id = %id), skip(self))]
    async fn delete_product(&self, id: ProductId) -> Result<(), ApiError> {
        debug!("Sending request");
        self.send(self.http.delete(self.url(&format!("products/delete/{id}")))).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        debug!("Sending request");
        Ok(self.fetch::<Vec<Order>>("orders").await?.unwrap_or_default())
    }

    #[instrument(fields(order_id = %id), skip(self))]
    async fn show_order(&self, id: &OrderId) -> Result<Order, ApiError> {
        debug!("Sending request");
        self.fetch(&format!("orders/show/{id}"))
            .await?
            .ok_or_else(|| ApiError::NotFound(id.to_string()))
    }

    #[instrument(fields(order_code = %order.order_code), skip(self, order))]
    async fn create_order(&self, order: OrderCreate) -> Result<(), ApiError> {
        debug!("Sending request");
        self.send(self.http.post(self.url("orders/create")).json(&order)).await?;
        Ok(())
    }

    #[instrument(fields(order_id = %id), skip(self, order))]
    async fn update_order(&self, id: &OrderId, order: OrderUpdate) -> Result<(), ApiError> {
        debug!("Sending request");
        self.send(self.http.put(self.url(&format!("orders/update/{id}"))).json(&order)).await?;
        Ok(())
    }

    #[instrument(fields(order_id = %id), skip(self))]
    async fn delete_order(&self, id: &OrderId) -> Result<(), ApiError> {
        debug!("Sending request");
        self.send(self.http.delete(self.url(&format!("orders/delete/{id}")))).await?;
        Ok(())
    }
}
