use crate::domain::error::DomainError;
use crate::domain::model::{AppliedCoupon, InventoryId, Money, ProductId};

/// カート明細
/// 注文組み立て中の一時的な選択。単独では永続化されない
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    inventory_id: InventoryId,
    product_id: ProductId,
    name: String,
    unit_price: Money,
    quantity: u32,
    max_quantity: u32,
}

impl CartLine {
    /// 新しいカート明細を作成
    /// 不変条件: 1 ≤ quantity ≤ max_quantity
    pub fn new(
        inventory_id: InventoryId,
        product_id: ProductId,
        name: String,
        unit_price: Money,
        quantity: u32,
        max_quantity: u32,
    ) -> Result<Self, DomainError> {
        if quantity == 0 || max_quantity == 0 {
            return Err(DomainError::InvalidQuantity);
        }
        Ok(Self {
            inventory_id,
            product_id,
            name,
            unit_price,
            quantity: quantity.min(max_quantity),
            max_quantity,
        })
    }

    /// 在庫行IDを取得
    pub fn inventory_id(&self) -> InventoryId {
        self.inventory_id
    }

    /// 商品IDを取得
    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    /// 商品名を取得
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 単価を取得
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// 数量を取得
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// スナップショット時点の数量上限を取得
    pub fn max_quantity(&self) -> u32 {
        self.max_quantity
    }

    /// 明細小計を計算（単価 × 数量）
    pub fn line_subtotal(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// カート
/// セッションスコープの選択状態。呼び出し側セッションが所有する
/// プレーンな値オブジェクトであり、プロセス全体の共有状態ではない。
/// 在庫への副作用は一切持たない（整合性はコミット時の再チェックで担保）
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
    applied_coupon: Option<AppliedCoupon>,
}

impl Cart {
    /// 新しい空のカートを作成
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            applied_coupon: None,
        }
    }

    /// カート明細のリストを取得
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// カートが空かどうか
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// 商品をカートに追加
    /// 同じ商品の明細が既に存在する場合は数量を1増やす（上限でクランプ）。
    /// 同一商品の明細が重複して作られることはない
    pub fn add_line(
        &mut self,
        inventory_id: InventoryId,
        product_id: ProductId,
        name: String,
        unit_price: Money,
        max_quantity: u32,
    ) -> Result<(), DomainError> {
        if let Some(existing) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            existing.quantity = (existing.quantity + 1).min(existing.max_quantity);
            return Ok(());
        }

        let line = CartLine::new(inventory_id, product_id, name, unit_price, 1, max_quantity)?;
        self.lines.push(line);
        Ok(())
    }

    /// 明細の数量を変更
    /// 数量は [1, max_quantity] にクランプされる。1未満は拒否
    /// （明細を消したい場合は remove_line を使う）。
    /// 存在しない商品IDに対しては何もしない（UIの寛容な編集に合わせる）
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> Result<(), DomainError> {
        if quantity < 1 {
            return Err(DomainError::InvalidQuantity);
        }
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product_id)
        {
            line.quantity = quantity.min(line.max_quantity);
        }
        Ok(())
    }

    /// 明細を削除
    /// 存在しない場合は何もしない
    pub fn remove_line(&mut self, product_id: ProductId) {
        self.lines.retain(|line| line.product_id != product_id);
    }

    /// 小計を計算（全明細の 数量 × 単価 の合計）
    pub fn subtotal(&self) -> Money {
        self.lines
            .iter()
            .map(|line| line.line_subtotal())
            .fold(Money::zero(), |acc, amount| acc.add(&amount).unwrap_or(acc))
    }

    /// クーポンを適用
    /// 同時に適用できるクーポンは1つだけ。既に適用済みの場合は
    /// 明示的に remove_coupon してからでないと失敗する（書き込みは一度だけ）
    pub fn apply_coupon(&mut self, coupon: AppliedCoupon) -> Result<(), DomainError> {
        if self.applied_coupon.is_some() {
            return Err(DomainError::CouponAlreadyApplied);
        }
        self.applied_coupon = Some(coupon);
        Ok(())
    }

    /// 適用済みクーポンを解除
    /// レジストリへの問い合わせは不要な純粋クライアント操作
    pub fn remove_coupon(&mut self) {
        self.applied_coupon = None;
    }

    /// 適用済みクーポンを取得
    pub fn applied_coupon(&self) -> Option<&AppliedCoupon> {
        self.applied_coupon.as_ref()
    }

    /// 割引額を取得（クーポン未適用なら0）
    pub fn discount_amount(&self) -> Money {
        self.applied_coupon
            .as_ref()
            .map(|coupon| coupon.discount_amount)
            .unwrap_or_else(Money::zero)
    }

    /// 合計を計算: max(0, 小計 − 割引額)
    pub fn total(&self) -> Money {
        self.subtotal().subtract_clamped(&self.discount_amount())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{CouponId, DiscountType};

    fn add_test_line(cart: &mut Cart, price: i64, max: u32) -> ProductId {
        let product_id = ProductId::new();
        cart.add_line(
            InventoryId::new(),
            product_id,
            "テスト商品".to_string(),
            Money::usd(price),
            max,
        )
        .unwrap();
        product_id
    }

    #[test]
    fn test_add_line_creates_line_with_quantity_one() {
        let mut cart = Cart::new();
        add_test_line(&mut cart, 1000, 5);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity(), 1);
    }

    #[test]
    fn test_add_same_product_increments_quantity() {
        let mut cart = Cart::new();
        let product_id = ProductId::new();
        let inventory_id = InventoryId::new();

        for _ in 0..3 {
            cart.add_line(
                inventory_id,
                product_id,
                "テスト商品".to_string(),
                Money::usd(1000),
                5,
            )
            .unwrap();
        }

        // 重複した明細は作られず数量が累積される
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity(), 3);
    }

    #[test]
    fn test_add_same_product_clamped_at_max() {
        let mut cart = Cart::new();
        let product_id = ProductId::new();
        let inventory_id = InventoryId::new();

        for _ in 0..10 {
            cart.add_line(
                inventory_id,
                product_id,
                "テスト商品".to_string(),
                Money::usd(1000),
                3,
            )
            .unwrap();
        }

        assert_eq!(cart.lines()[0].quantity(), 3);
    }

    #[test]
    fn test_add_line_with_zero_stock_fails() {
        let mut cart = Cart::new();
        let result = cart.add_line(
            InventoryId::new(),
            ProductId::new(),
            "売り切れ商品".to_string(),
            Money::usd(1000),
            0,
        );
        assert!(result.is_err());
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity_clamps_to_max() {
        let mut cart = Cart::new();
        let product_id = add_test_line(&mut cart, 1000, 4);

        cart.set_quantity(product_id, 99).unwrap();
        assert_eq!(cart.lines()[0].quantity(), 4);
    }

    #[test]
    fn test_set_quantity_below_one_rejected() {
        let mut cart = Cart::new();
        let product_id = add_test_line(&mut cart, 1000, 4);

        let result = cart.set_quantity(product_id, 0);
        assert!(result.is_err());
        assert_eq!(cart.lines()[0].quantity(), 1);
    }

    #[test]
    fn test_set_quantity_on_missing_product_is_noop() {
        let mut cart = Cart::new();
        add_test_line(&mut cart, 1000, 4);

        let result = cart.set_quantity(ProductId::new(), 2);
        assert!(result.is_ok());
        assert_eq!(cart.lines()[0].quantity(), 1);
    }

    #[test]
    fn test_remove_line() {
        let mut cart = Cart::new();
        let product_id = add_test_line(&mut cart, 1000, 4);

        cart.remove_line(product_id);
        assert!(cart.is_empty());

        // 存在しない明細の削除は何もしない
        cart.remove_line(product_id);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_subtotal() {
        let mut cart = Cart::new();
        let product_id = add_test_line(&mut cart, 1000, 5);
        cart.set_quantity(product_id, 3).unwrap();
        add_test_line(&mut cart, 250, 2);

        // 3 × 10.00 + 1 × 2.50 = 32.50
        assert_eq!(cart.subtotal().amount(), 3250);
    }

    #[test]
    fn test_apply_coupon_is_write_once() {
        let mut cart = Cart::new();
        add_test_line(&mut cart, 1000, 5);

        let coupon = AppliedCoupon {
            coupon_id: CouponId::new(),
            code: "SAVE10".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 10,
            discount_amount: Money::usd(100),
        };
        cart.apply_coupon(coupon.clone()).unwrap();

        let result = cart.apply_coupon(coupon);
        assert_eq!(result.unwrap_err(), DomainError::CouponAlreadyApplied);
    }

    #[test]
    fn test_remove_coupon_reverts_to_full_subtotal() {
        let mut cart = Cart::new();
        add_test_line(&mut cart, 1000, 5);

        let coupon = AppliedCoupon {
            coupon_id: CouponId::new(),
            code: "SAVE10".to_string(),
            discount_type: DiscountType::Percentage,
            discount_value: 10,
            discount_amount: Money::usd(100),
        };
        cart.apply_coupon(coupon).unwrap();
        assert_eq!(cart.total().amount(), 900);

        cart.remove_coupon();
        assert_eq!(cart.total().amount(), 1000);

        // 解除後は再適用できる
        let coupon2 = AppliedCoupon {
            coupon_id: CouponId::new(),
            code: "FIVEOFF".to_string(),
            discount_type: DiscountType::Fixed,
            discount_value: 500,
            discount_amount: Money::usd(500),
        };
        assert!(cart.apply_coupon(coupon2).is_ok());
    }
}
