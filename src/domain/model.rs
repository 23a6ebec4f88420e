// ドメインモデル（エンティティと値オブジェクト）

mod value_objects;
mod cart;
mod coupon;
mod order;
mod inventory;

pub use value_objects::{
    OrderId, StoreId, ProductId, InventoryId, CouponId,
    Money, Currency,
    OrderNumber,
    OrderItem,
    DeliveryAddress, FulfillmentDetails,
    OrderStatus,
};

pub use cart::{Cart, CartLine};
pub use coupon::{AppliedCoupon, Coupon, DiscountType};
pub use order::Order;
pub use inventory::InventoryLine;
