use abect_event_bus::{EventBus, EventReceiverExt};

#[derive(Debug, Clone, PartialEq, Eq)]
struct LeadSubmitted(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
struct ConfigReloaded;

#[tokio::test]
async fn events_reach_every_subscriber() {
    let bus = EventBus::new();
    let mut first = bus.subscribe::<LeadSubmitted>().unwrap();
    let mut second = bus.subscribe::<LeadSubmitted>().unwrap();

    assert_eq!(bus.publish(LeadSubmitted(7)).unwrap(), 2);

    assert_eq!(*first.next_event().await.unwrap(), LeadSubmitted(7));
    assert_eq!(*second.next_event().await.unwrap(), LeadSubmitted(7));
}

#[tokio::test]
async fn channels_are_isolated_by_type() {
    let bus = EventBus::new();
    let mut leads = bus.subscribe::<LeadSubmitted>().unwrap();
    let _reloads = bus.subscribe::<ConfigReloaded>().unwrap();

    bus.publish(ConfigReloaded).unwrap();
    bus.publish(LeadSubmitted(1)).unwrap();

    assert_eq!(*leads.next_event().await.unwrap(), LeadSubmitted(1));
}

#[tokio::test]
async fn lagging_receiver_resumes_from_retained_tail() {
    let bus = EventBus::new();
    let capacity = 2;
    let mut rx = bus.subscribe_with_capacity::<LeadSubmitted>(capacity).unwrap();

    for i in 0..50 {
        bus.publish(LeadSubmitted(i)).unwrap();
    }

    let first = rx.next_event().await.unwrap();
    assert_eq!(first.0, 48);
    let second = rx.next_event().await.unwrap();
    assert_eq!(second.0, 49);
}

#[tokio::test]
async fn shutdown_closes_receivers() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe::<LeadSubmitted>().unwrap();

    assert_eq!(bus.shutdown(), 1);
    assert!(rx.next_event().await.is_none());
}
