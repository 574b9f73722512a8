//! Tests for the UI contract and tokio adapter

use std::sync::Arc;

use smart_parking::core::{AllocationService, ParkingError, SlotStatus, SlotStore};
use smart_parking::infra::store::SqliteSlotStore;
use smart_parking::runtime::{BookRequest, ParkingApi, ReleaseRequest, TokioParkingApi};

fn api(capacity: u32) -> ParkingApi<SqliteSlotStore> {
    let store = Arc::new(SqliteSlotStore::open_in_memory().unwrap());
    store.initialize(capacity).unwrap();
    ParkingApi::new(Arc::new(AllocationService::new(store)))
}

fn book(name: &str) -> BookRequest {
    BookRequest {
        occupant_name: name.to_string(),
    }
}

#[test]
fn test_admin_list_has_full_detail() {
    let api = api(2);
    let booked = api.book(&book("Ann")).unwrap();
    let slots = api.admin_list().unwrap();
    assert_eq!(slots[0].occupant_name.as_deref(), Some("Ann"));
    assert_eq!(slots[0].booking_id.as_ref(), Some(&booked.booking_id));
    assert_eq!(slots[1].status, SlotStatus::Available);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_adapter_round_trip() {
    let api = TokioParkingApi::try_current(api(2)).unwrap();

    let booked = api.book(book("Ann")).await.unwrap();
    assert_eq!(booked.slot_id, 1);
    assert_eq!(api.summary().await.unwrap().occupied, 1);

    let released = api
        .release(ReleaseRequest {
            booking_id: booked.booking_id.to_string(),
        })
        .await
        .unwrap();
    assert_eq!(released.slot_id, 1);
    assert!(api
        .get_floor_map()
        .await
        .unwrap()
        .iter()
        .all(|c| c.status == SlotStatus::Available));
    assert_eq!(api.admin_history(Some(5)).await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_tokio_adapter_concurrent_last_slot() {
    let api = TokioParkingApi::try_current(api(1)).unwrap();
    let tasks: Vec<_> = (0..8)
        .map(|i| {
            let api = api.clone();
            tokio::spawn(async move { api.book(book(&format!("driver-{i}"))).await })
        })
        .collect();

    let mut wins = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => wins += 1,
            Err(ParkingError::NoAvailableSlot) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(wins, 1);
    assert_eq!(api.admin_reset().await.unwrap().freed, 1);
    assert_eq!(api.admin_list().await.unwrap().len(), 1);
}

#[test]
fn test_try_current_outside_runtime_fails() {
    assert!(matches!(
        TokioParkingApi::try_current(api(1)),
        Err(ParkingError::Internal(_))
    ));
}
