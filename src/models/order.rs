use crate::enums::side::OrderSide;

/// A limit order for one leg of a triangle
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: f64,
    pub limit_price: f64,
}

/// Exchange acknowledgement of a placed order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderAck {
    pub order_id: String,
    pub symbol: String,
    pub side: OrderSide,
    pub status: String,
}
