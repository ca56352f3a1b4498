use kiosk_core::{ContactDetails, ItemStore, Order, OrderBook, OrderItem};
use rstest::rstest;

fn contact(first: &str) -> ContactDetails {
    ContactDetails {
        first_name: first.to_string(),
        email_address: format!("{}@example.com", first.to_lowercase()),
        ..ContactDetails::default()
    }
}

#[rstest]
fn confirm_details_creates_item_when_none() {
    let mut book = OrderBook::new();
    assert!(book.current_item().is_none());
    let id = book.confirm_details(contact("Ana"), contact("Ben")).id.clone();
    let item = book.current_item().expect("item");
    assert_eq!(item.id, id);
    assert_eq!(item.sender.first_name, "Ana");
    assert_eq!(item.recipient.first_name, "Ben");
}

#[rstest]
fn confirm_details_keeps_detected_parcel() {
    let mut book = OrderBook::new();
    let item = OrderItem::new().with_parcel(0.8, "Small Box");
    let id = item.id.clone();
    book.set_current_item(Some(item));
    book.confirm_details(contact("Ana"), contact("Ben"));
    let item = book.current_item().expect("item");
    assert_eq!(item.id, id);
    assert_eq!(item.parcel_size.as_deref(), Some("Small Box"));
    assert_eq!(item.recipient.email_address, "ben@example.com");
}

#[rstest]
fn items_are_added_and_removed_by_order() {
    let mut book = OrderBook::new();
    let order = Order::new();
    let order_id = order.id.clone();
    book.add_order(order);
    assert!(book.add_item_to_order(&order_id, OrderItem::new()));
    assert!(book.add_item_to_order(&order_id, OrderItem::new()));
    assert!(!book.add_item_to_order("missing", OrderItem::new()));
    assert_eq!(book.orders()[0].items.len(), 2);

    assert!(book.remove_item_from_order(&order_id, 1));
    assert!(!book.remove_item_from_order(&order_id, 5));
    assert_eq!(book.orders()[0].items.len(), 1);

    assert!(book.remove_order(&order_id));
    assert!(!book.remove_order(&order_id));
    assert!(book.orders().is_empty());
}

#[rstest]
fn current_order_is_tracked() {
    let mut book = OrderBook::new();
    let order = Order::new();
    book.set_current_order(Some(order.clone()));
    assert_eq!(book.current_order(), Some(&order));
    book.set_current_order(None);
    assert!(book.current_order().is_none());
}
