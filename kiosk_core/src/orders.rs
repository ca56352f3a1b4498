//! Orders, order items and the current-item store.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Sender or recipient contact block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactDetails {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub email_address: String,
    pub contact_number: String,
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub country: String,
}

/// One parcel being shipped.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub id: String,
    pub parcel_weight_kg: Option<f64>,
    pub parcel_size: Option<String>,
    pub sender: ContactDetails,
    pub recipient: ContactDetails,
}

impl OrderItem {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            parcel_weight_kg: None,
            parcel_size: None,
            sender: ContactDetails::default(),
            recipient: ContactDetails::default(),
        }
    }

    /// Copy of this item with the detected parcel attached.
    pub fn with_parcel(&self, weight_kg: f64, size: &str) -> Self {
        Self {
            parcel_weight_kg: Some(weight_kg),
            parcel_size: Some(size.to_owned()),
            ..self.clone()
        }
    }
}

impl Default for OrderItem {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: String,
    pub date_created: DateTime<Utc>,
    pub items: Vec<OrderItem>,
}

impl Order {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            date_created: Utc::now(),
            items: Vec::new(),
        }
    }
}

impl Default for Order {
    fn default() -> Self {
        Self::new()
    }
}

/// Holder of the item currently being edited.
pub trait ItemStore {
    fn current_item(&self) -> Option<&OrderItem>;
    fn set_current_item(&mut self, item: Option<OrderItem>);
}

/// In-memory order list plus the current order/item.
#[derive(Debug, Default)]
pub struct OrderBook {
    orders: Vec<Order>,
    current_order: Option<Order>,
    current_item: Option<OrderItem>,
}

impl OrderBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn add_order(&mut self, order: Order) {
        tracing::debug!(order_id = %order.id, "order added");
        self.orders.push(order);
    }

    /// Remove an order by id; `false` if no such order.
    pub fn remove_order(&mut self, order_id: &str) -> bool {
        let before = self.orders.len();
        self.orders.retain(|o| o.id != order_id);
        self.orders.len() != before
    }

    pub fn current_order(&self) -> Option<&Order> {
        self.current_order.as_ref()
    }

    pub fn set_current_order(&mut self, order: Option<Order>) {
        self.current_order = order;
    }

    pub fn add_item_to_order(&mut self, order_id: &str, item: OrderItem) -> bool {
        match self.orders.iter_mut().find(|o| o.id == order_id) {
            Some(order) => {
                order.items.push(item);
                true
            }
            None => false,
        }
    }

    /// Remove the item at `index` from an order; `false` if either is missing.
    pub fn remove_item_from_order(&mut self, order_id: &str, index: usize) -> bool {
        match self.orders.iter_mut().find(|o| o.id == order_id) {
            Some(order) if index < order.items.len() => {
                order.items.remove(index);
                true
            }
            _ => false,
        }
    }

    /// Attach sender and recipient to the current item, creating one if needed.
    pub fn confirm_details(&mut self, sender: ContactDetails, recipient: ContactDetails) -> &OrderItem {
        let mut item = self.current_item.take().unwrap_or_default();
        item.sender = sender;
        item.recipient = recipient;
        self.current_item.insert(item)
    }
}

impl ItemStore for OrderBook {
    fn current_item(&self) -> Option<&OrderItem> {
        self.current_item.as_ref()
    }

    fn set_current_item(&mut self, item: Option<OrderItem>) {
        self.current_item = item;
    }
}
