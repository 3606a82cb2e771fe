#[cfg(test)]
mod tests {
    use crate::actor_framework::{FrameworkError, ResourceRequest};
    use crate::api::{Backend, MemoryBackend};
    use crate::clients::FormClient;
    use crate::domain::{
        AuditTrail, Operator, Order, OrderId, OrderStatus, Product, ProductCreate, ProductId,
        ProductPatch,
    };
    use crate::error::ApiError;
    use crate::form::{FormError, FormMode, FormSession, SubmitOutcome};
    use crate::mock_framework::{
        create_mock_client, expect_create, expect_delete, expect_get, expect_list, expect_update,
    };
    use crate::notice::{NoticeLevel, Notifier};
    use crate::reconciler::Selection;
    use crate::views::OrderListView;
    use chrono::{NaiveDate, TimeZone, Utc};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    fn kopi() -> Product {
        Product::new(1, "Kopi", 15000, 5)
    }

    fn teh() -> Product {
        Product::new(2, "Teh", 8000, 20)
    }

    fn stored_order() -> Order {
        Order {
            id: OrderId::from("order_1"),
            order_code: "ORD-1700000000000".into(),
            product_name: "Teh".into(),
            product_id: Some(ProductId(2)),
            quantity: 4,
            price: 32000,
            status: OrderStatus::Processing,
            start_process: Some(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap()),
            end_process: None,
            payment_type: "transfer".into(),
            audit: AuditTrail { creby: Some("admin".into()), ..AuditTrail::default() },
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn midnight(y: i32, m: u32, d: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap()
    }

    fn spawn_session(backend: MemoryBackend, notifier: &Notifier, mode: FormMode) -> FormClient {
        let (session, client) = FormSession::new(8, Arc::new(backend), notifier.clone(), mode);
        tokio::spawn(session.run());
        client
    }

    #[tokio::test]
    async fn test_superseded_catalog_does_not_overwrite_newer_one() {
        let (products, mut product_rx) = create_mock_client::<Product>(8);
        let (orders, _order_rx) = create_mock_client::<Order>(8);
        let backend = MemoryBackend::new(products, orders);
        let client = spawn_session(backend, &Notifier::new(8), FormMode::Create);

        let first = tokio::spawn({
            let client = client.clone();
            async move { client.refresh_catalog().await }
        });
        let first_reply = expect_list(&mut product_rx).await.expect("Expected first catalog fetch");

        let second = tokio::spawn({
            let client = client.clone();
            async move { client.refresh_catalog().await }
        });
        let second_reply =
            expect_list(&mut product_rx).await.expect("Expected second catalog fetch");

        // newer fetch lands first
        second_reply.send(Ok(vec![kopi(), teh()])).unwrap();
        assert_eq!(second.await.unwrap(), Ok(2));

        let line = client.select_product(Some(ProductId(1))).await.unwrap();
        assert_eq!((line.quantity, line.total), (1, 15000));

        // the stale, empty catalog arrives afterwards and must be ignored
        first_reply.send(Ok(vec![])).unwrap();
        assert_eq!(first.await.unwrap(), Err(FormError::CatalogSuperseded(1)));

        let draft = client.snapshot().await.unwrap();
        assert_eq!(draft.line.selected_id(), Some(ProductId(1)));
        assert_eq!(draft.line.catalog().selectable_count(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_keeps_catalog_and_line() {
        let (products, mut product_rx) = create_mock_client::<Product>(8);
        let (orders, _order_rx) = create_mock_client::<Order>(8);
        let notifier = Notifier::new(8);
        let mut notices = notifier.subscribe();
        let backend = MemoryBackend::new(products, orders);
        let client = spawn_session(backend, &notifier, FormMode::Create);

        let refresh = tokio::spawn({
            let client = client.clone();
            async move { client.refresh_catalog().await }
        });
        expect_list(&mut product_rx).await.unwrap().send(Ok(vec![kopi()])).unwrap();
        assert_eq!(refresh.await.unwrap(), Ok(1));
        client.select_product(Some(ProductId(1))).await.unwrap();
        client.set_quantity(3).await.unwrap();

        let refresh = tokio::spawn({
            let client = client.clone();
            async move { client.refresh_catalog().await }
        });
        expect_list(&mut product_rx)
            .await
            .unwrap()
            .send(Err(FrameworkError::ActorDropped))
            .unwrap();
        assert!(matches!(refresh.await.unwrap(), Err(FormError::Api(_))));

        let notice = notices.recv().await.unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);

        let draft = client.snapshot().await.unwrap();
        assert_eq!(draft.line.selected_id(), Some(ProductId(1)));
        assert_eq!((draft.line.quantity(), draft.line.total()), (3, 45000));
    }

    #[tokio::test]
    async fn test_refresh_reconciles_removed_and_shrunk_products() {
        let (products, mut product_rx) = create_mock_client::<Product>(8);
        let (orders, _order_rx) = create_mock_client::<Order>(8);
        let backend = MemoryBackend::new(products, orders);
        let client = spawn_session(backend, &Notifier::new(8), FormMode::Create);

        async fn refresh_with(
            client: &FormClient,
            product_rx: &mut mpsc::Receiver<ResourceRequest<Product>>,
            catalog: Vec<Product>,
        ) -> usize {
            let task = tokio::spawn({
                let client = client.clone();
                async move { client.refresh_catalog().await }
            });
            expect_list(product_rx).await.unwrap().send(Ok(catalog)).unwrap();
            task.await.unwrap().unwrap()
        }

        refresh_with(&client, &mut product_rx, vec![kopi(), teh()]).await;
        client.select_product(Some(ProductId(2))).await.unwrap();
        let line = client.set_quantity(15).await.unwrap();
        assert_eq!((line.quantity, line.total), (15, 120000));

        // stock drops below the chosen quantity
        let mut low = teh();
        low.stock = 6;
        refresh_with(&client, &mut product_rx, vec![kopi(), low]).await;
        let draft = client.snapshot().await.unwrap();
        assert_eq!((draft.line.quantity(), draft.line.total()), (6, 48000));

        // deactivated counts as removed
        assert_eq!(refresh_with(&client, &mut product_rx, vec![kopi(), teh().inactive()]).await, 1);
        let draft = client.snapshot().await.unwrap();
        assert_eq!(draft.line.selection(), &Selection::NoSelection);
        assert_eq!((draft.line.quantity(), draft.line.total()), (1, 0));
    }

    #[tokio::test]
    async fn test_order_update_flow() {
        let (products, mut product_rx) = create_mock_client::<Product>(8);
        let (orders, mut order_rx) = create_mock_client::<Order>(8);
        let notifier = Notifier::new(8);
        let mut notices = notifier.subscribe();
        let id = OrderId::from("order_1");
        let backend = MemoryBackend::new(products, orders);
        let client = spawn_session(backend, &notifier, FormMode::Update(id.clone()));

        // 1. Load: catalog first, then the order
        let load = tokio::spawn({
            let client = client.clone();
            let id = id.clone();
            async move { client.load_order(id).await }
        });
        expect_list(&mut product_rx)
            .await
            .expect("Expected catalog fetch")
            .send(Ok(vec![kopi(), teh()]))
            .unwrap();
        let (requested, responder) = expect_get(&mut order_rx).await.expect("Expected order fetch");
        assert_eq!(requested, id);
        responder.send(Ok(Some(stored_order()))).unwrap();

        let draft = load.await.unwrap().unwrap();
        assert_eq!(draft.line.selected_id(), Some(ProductId(2)));
        assert_eq!((draft.line.quantity(), draft.line.total()), (4, 32000));
        assert_eq!(draft.status, OrderStatus::Processing);

        // 2. Edit and submit
        client.select_product(Some(ProductId(1))).await.unwrap();
        client.set_quantity(2).await.unwrap();
        client.set_status(OrderStatus::Completed).await.unwrap();
        client.set_process_dates(Some(date(2025, 3, 1)), Some(date(2025, 3, 5))).await.unwrap();
        let submit = tokio::spawn({
            let client = client.clone();
            async move { client.submit(Operator::new("Sari")).await }
        });

        let (product_id, responder) =
            expect_get(&mut product_rx).await.expect("Expected product lookup");
        assert_eq!(product_id, ProductId(1));
        responder.send(Ok(Some(kopi()))).unwrap();

        let (updated_id, revision, responder) =
            expect_update(&mut order_rx).await.expect("Expected order update");
        assert_eq!(updated_id, id);
        assert_eq!(revision.product_name, "Kopi");
        assert_eq!(revision.order.quantity, 2);
        assert_eq!(revision.order.price, 30000);
        assert_eq!(revision.order.modby, "Sari");
        assert_eq!(revision.order.order_code, "ORD-1700000000000");
        assert_eq!(revision.order.status, OrderStatus::Completed);
        assert_eq!(revision.order.end_process, Some(midnight(2025, 3, 5)));
        let mut updated = stored_order();
        updated.product_id = Some(ProductId(1));
        updated.quantity = 2;
        updated.price = 30000;
        responder.send(Ok(updated.clone())).unwrap();

        // 3. Reload after the update
        expect_list(&mut product_rx)
            .await
            .expect("Expected catalog reload")
            .send(Ok(vec![kopi(), teh()]))
            .unwrap();
        let (_, responder) = expect_get(&mut order_rx).await.expect("Expected order reload");
        responder.send(Ok(Some(updated))).unwrap();

        assert_eq!(submit.await.unwrap(), Ok(SubmitOutcome::Updated { id }));
        assert_eq!(notices.recv().await.unwrap().level, NoticeLevel::Success);

        let draft = client.snapshot().await.unwrap();
        assert_eq!(draft.line.selected_id(), Some(ProductId(1)));
        assert_eq!((draft.line.quantity(), draft.line.total()), (2, 30000));
    }

    #[tokio::test]
    async fn test_loading_unknown_order_reports_not_found() {
        let (products, mut product_rx) = create_mock_client::<Product>(8);
        let (orders, mut order_rx) = create_mock_client::<Order>(8);
        let notifier = Notifier::new(8);
        let mut notices = notifier.subscribe();
        let id = OrderId::from("missing");
        let backend = MemoryBackend::new(products, orders);
        let client = spawn_session(backend, &notifier, FormMode::Update(id.clone()));

        let load = tokio::spawn({
            let client = client.clone();
            async move { client.load_order(id).await }
        });
        expect_list(&mut product_rx).await.unwrap().send(Ok(vec![kopi()])).unwrap();
        let (_, responder) = expect_get(&mut order_rx).await.unwrap();
        responder.send(Ok(None)).unwrap();

        assert!(matches!(load.await.unwrap(), Err(FormError::Api(ApiError::NotFound(_)))));
        assert_eq!(notices.recv().await.unwrap().level, NoticeLevel::Error);
        // the catalog fetched along the way is still usable
        let line = client.select_product(Some(ProductId(1))).await.unwrap();
        assert_eq!(line.total, 15000);
    }

    #[tokio::test]
    async fn test_form_edits_reach_create_payload() {
        let (products, mut product_rx) = create_mock_client::<Product>(8);
        let (orders, mut order_rx) = create_mock_client::<Order>(8);
        let backend = MemoryBackend::new(products, orders);
        let client = spawn_session(backend, &Notifier::new(8), FormMode::Create);

        let refresh = tokio::spawn({
            let client = client.clone();
            async move { client.refresh_catalog().await }
        });
        expect_list(&mut product_rx).await.unwrap().send(Ok(vec![kopi()])).unwrap();
        refresh.await.unwrap().unwrap();

        client.set_order_code("ORD-CUSTOM".into()).await.unwrap();
        client.set_status(OrderStatus::Processing).await.unwrap();
        client.set_process_dates(Some(date(2025, 6, 2)), Some(date(2025, 6, 9))).await.unwrap();
        client.select_product(Some(ProductId(1))).await.unwrap();
        client.set_quantity(2).await.unwrap();
        client.set_payment_type("qris".into()).await.unwrap();

        let submit = tokio::spawn({
            let client = client.clone();
            async move { client.submit(Operator::new("Sari")).await }
        });

        let (product_id, responder) = expect_get(&mut product_rx).await.unwrap();
        assert_eq!(product_id, ProductId(1));
        responder.send(Ok(Some(kopi()))).unwrap();

        let (created, responder) =
            expect_create(&mut order_rx).await.expect("Expected Order Create");
        assert_eq!(created.product_name, "Kopi");
        assert_eq!(created.order.order_code, "ORD-CUSTOM");
        assert_eq!(created.order.status, OrderStatus::Processing);
        assert_eq!(created.order.start_process, Some(midnight(2025, 6, 2)));
        assert_eq!(created.order.end_process, Some(midnight(2025, 6, 9)));
        assert_eq!((created.order.quantity, created.order.price), (2, 30000));
        assert_eq!(created.order.creby, "Sari");
        responder.send(Ok(stored_order())).unwrap();

        let outcome = submit.await.unwrap();
        assert_eq!(outcome, Ok(SubmitOutcome::Created { order_code: "ORD-CUSTOM".into() }));

        // a fresh draft starts pending with a new code
        let draft = client.snapshot().await.unwrap();
        assert_eq!(draft.status, OrderStatus::Pending);
        assert_ne!(draft.order_code, "ORD-CUSTOM");
    }

    #[tokio::test]
    async fn test_background_load_failure_keeps_catalog() {
        let (products, mut product_rx) = create_mock_client::<Product>(8);
        let (orders, _order_rx) = create_mock_client::<Order>(8);
        let notifier = Notifier::new(8);
        let mut notices = notifier.subscribe();
        let backend = MemoryBackend::new(products, orders);
        let client = spawn_session(backend, &notifier, FormMode::Create);

        let refresh = tokio::spawn({
            let client = client.clone();
            async move { client.refresh_catalog().await }
        });
        expect_list(&mut product_rx).await.unwrap().send(Ok(vec![kopi()])).unwrap();
        refresh.await.unwrap().unwrap();
        client.select_product(Some(ProductId(1))).await.unwrap();

        // nobody waits on this fetch
        assert_eq!(client.load_catalog().await, Ok(2));
        let reply = expect_list(&mut product_rx).await.expect("Expected background fetch");
        reply.send(Err(FrameworkError::ActorDropped)).unwrap();

        let notice = notices.recv().await.unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);

        let draft = client.snapshot().await.unwrap();
        assert_eq!(draft.line.catalog().selectable_count(), 1);
        assert_eq!(draft.line.selected_id(), Some(ProductId(1)));
    }

    #[tokio::test]
    async fn test_catalog_edits_reach_open_form() {
        let (backend, _handles) = MemoryBackend::spawn(8);
        backend
            .create_product(ProductCreate {
                name: "Kopi".into(),
                price: 15000,
                stock: 5,
                active: true,
                image: None,
                creby: "admin".into(),
                cretime: Utc::now(),
            })
            .await
            .unwrap();
        let client = spawn_session(backend.clone(), &Notifier::new(8), FormMode::Create);

        assert_eq!(client.refresh_catalog().await, Ok(1));
        client.select_product(Some(ProductId(1))).await.unwrap();
        let line = client.set_quantity(5).await.unwrap();
        assert_eq!((line.quantity, line.total), (5, 75000));

        // restocked down to 2 while the form is open
        let restock = ProductPatch { stock: Some(2), ..ProductPatch::default() };
        backend.patch_product(ProductId(1), restock).await.unwrap();
        client.refresh_catalog().await.unwrap();
        let draft = client.snapshot().await.unwrap();
        assert_eq!((draft.line.quantity(), draft.line.total()), (2, 30000));

        let deactivate = ProductPatch { active: Some(false), ..ProductPatch::default() };
        backend.patch_product(ProductId(1), deactivate).await.unwrap();
        assert_eq!(client.refresh_catalog().await, Ok(0));
        let draft = client.snapshot().await.unwrap();
        assert_eq!(draft.line.selection(), &Selection::NoSelection);
        assert_eq!((draft.line.quantity(), draft.line.total()), (1, 0));
    }

    #[tokio::test]
    async fn test_order_list_delete_reloads_or_reports() {
        let (products, _product_rx) = create_mock_client::<Product>(8);
        let (orders, mut order_rx) = create_mock_client::<Order>(8);
        let notifier = Notifier::new(8);
        let mut notices = notifier.subscribe();
        let view = OrderListView::new(Arc::new(MemoryBackend::new(products, orders)), notifier);

        let delete = tokio::spawn({
            let view = view.clone();
            async move { view.delete(&OrderId::from("order_1")).await }
        });
        let (id, responder) = expect_delete(&mut order_rx).await.expect("Expected Order Delete");
        assert_eq!(id, OrderId::from("order_1"));
        responder.send(Ok(())).unwrap();
        expect_list(&mut order_rx).await.expect("Expected reload").send(Ok(vec![])).unwrap();
        assert_eq!(delete.await.unwrap(), Ok(vec![]));
        assert_eq!(notices.recv().await.unwrap().level, NoticeLevel::Success);

        let delete = tokio::spawn(async move { view.delete(&OrderId::from("gone")).await });
        let (_, responder) = expect_delete(&mut order_rx).await.unwrap();
        responder.send(Err(FrameworkError::NotFound("gone".into()))).unwrap();
        assert_eq!(delete.await.unwrap(), Err(ApiError::NotFound("gone".into())));
        assert_eq!(notices.recv().await.unwrap().level, NoticeLevel::Error);
    }
}
