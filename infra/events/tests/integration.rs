use cmt_event_bus::{EventBus, EventReceiverExt};

#[derive(Clone, Debug, PartialEq, Eq)]
struct SubmissionReceived(pub usize);

#[tokio::test]
async fn test_event_flow() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<SubmissionReceived>().unwrap();

    let event = SubmissionReceived(42);
    bus.publish(event.clone()).unwrap();

    let received = rx.recv().await.unwrap();
    assert_eq!(*received, event);
}

#[tokio::test]
async fn test_receiver_lagged_recovery() {
    let bus = EventBus::new();
    let capacity = 2;
    let mut rx = bus.subscribe_with_capacity::<SubmissionReceived>(capacity).unwrap();

    let total_messages = 100;
    for i in 0..total_messages {
        bus.publish(SubmissionReceived(i)).unwrap();
    }

    let first_received = rx.next().await.expect("channel should still be open");
    assert!(
        first_received.0 >= (total_messages - capacity),
        "should have skipped to the fresh tail of the buffer, got {}",
        first_received.0
    );

    let second_received = rx.next().await.expect("should continue receiving");
    assert_eq!(second_received.0, first_received.0 + 1);
}

#[tokio::test]
async fn test_multiple_subscribers_isolation() {
    let bus = EventBus::new();
    let mut rx1 = bus.subscribe::<SubmissionReceived>().unwrap();
    let mut rx2 = bus.subscribe::<SubmissionReceived>().unwrap();

    bus.publish(SubmissionReceived(100)).unwrap();

    let res1 = rx1.recv().await.unwrap();
    let res2 = rx2.recv().await.unwrap();

    assert_eq!(res1.0, res2.0);
}

#[tokio::test]
async fn test_multiple_event_types_are_isolated() {
    #[derive(Clone, Debug, PartialEq, Eq)]
    struct DecisionRecorded(pub usize);

    let bus = EventBus::new();
    let mut rx_submission = bus.subscribe::<SubmissionReceived>().unwrap();
    let mut rx_decision = bus.subscribe::<DecisionRecorded>().unwrap();

    bus.publish(SubmissionReceived(7)).unwrap();
    bus.publish(DecisionRecorded(13)).unwrap();

    assert_eq!(rx_submission.recv().await.unwrap().0, 7);
    assert_eq!(rx_decision.recv().await.unwrap().0, 13);
}

#[tokio::test]
async fn test_bus_clone_shares_channels() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<SubmissionReceived>().unwrap();

    let publisher = bus.clone();
    publisher.publish(SubmissionReceived(5)).unwrap();

    assert_eq!(rx.recv().await.unwrap().0, 5);
}

#[tokio::test]
async fn test_shutdown_closes_all_channels() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<SubmissionReceived>().unwrap();

    let closed = bus.shutdown();
    assert_eq!(closed, 1, "expected a single event channel to be closed");

    assert!(rx.next().await.is_none(), "receiver should observe channel closure");
}

#[tokio::test]
async fn test_publish_arc_avoids_copy() {
    use std::sync::Arc;

    let bus = EventBus::new();
    let mut rx = bus.subscribe::<SubmissionReceived>().unwrap();

    let event = Arc::new(SubmissionReceived(10));
    bus.publish_arc(event.clone()).unwrap();

    let received = rx.recv().await.unwrap();
    assert!(Arc::ptr_eq(&received, &event));
}

#[tokio::test]
async fn test_ordering_is_preserved() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<SubmissionReceived>().unwrap();

    for i in 0..10 {
        bus.publish(SubmissionReceived(i)).unwrap();
    }

    for i in 0..10 {
        assert_eq!(rx.recv().await.unwrap().0, i);
    }
}
