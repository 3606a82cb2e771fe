//! # Mock Framework
//!
//! Utilities for testing the backend and form sessions in isolation.
//!
//! Use [`create_mock_client`] to get a client and a receiver, wrap the clients in a
//! [`MemoryBackend`](crate::api::MemoryBackend), then answer each request with the
//! `expect_*` helpers. Replies are sent whenever the test chooses, which is how
//! slow or out-of-order backend responses are simulated.

use crate::actor_framework::{Entity, FrameworkError, ResourceClient, ResourceRequest};
use tokio::sync::{mpsc, oneshot};

pub type Reply<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Creates a mock client and a receiver for asserting requests.
pub fn create_mock_client<T: Entity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Next message must be a Create request.
pub async fn expect_create<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::CreateParams, Reply<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Next message must be a Get request.
pub async fn expect_get<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Reply<Option<T>>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Get { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

/// Next message must be a List request.
pub async fn expect_list<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<Reply<Vec<T>>> {
    match receiver.recv().await {
        Some(ResourceRequest::List { respond_to }) => Some(respond_to),
        _ => None,
    }
}

/// Next message must be an Update request.
pub async fn expect_update<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, T::UpdateParams, Reply<T>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Update { id, params, respond_to }) => Some((id, params, respond_to)),
        _ => None,
    }
}

/// Next message must be a Delete request.
pub async fn expect_delete<T: Entity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(T::Id, Reply<()>)> {
    match receiver.recv().await {
        Some(ResourceRequest::Delete { id, respond_to }) => Some((id, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Product, ProductId, ProductPatch};

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Product>(10);

        let list_task = tokio::spawn({
            let client = client.clone();
            async move { client.list().await }
        });
        let responder = expect_list(&mut receiver).await.expect("Expected List request");
        responder.send(Ok(vec![Product::new(ProductId(1), "Kopi", 15000, 3)])).unwrap();
        assert_eq!(list_task.await.unwrap().unwrap().len(), 1);

        let update_task = tokio::spawn(async move {
            let patch = ProductPatch { stock: Some(0), ..ProductPatch::default() };
            client.update(ProductId(1), patch).await
        });
        let (id, patch, responder) =
            expect_update(&mut receiver).await.expect("Expected Update request");
        assert_eq!(id, ProductId(1));
        assert_eq!(patch.stock, Some(0));
        responder.send(Err(FrameworkError::NotFound("1".into()))).unwrap();
        assert_eq!(update_task.await.unwrap(), Err(FrameworkError::NotFound("1".into())));
    }
}
