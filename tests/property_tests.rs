use proptest::prelude::*;
use store_order_management::domain::model::{
    AppliedCoupon, Cart, Coupon, CouponId, DiscountType, InventoryId, Money, OrderItem,
    OrderNumber, OrderStatus, ProductId,
};

/// 全ステータスのリスト(戦略生成用)
const ALL_STATUSES: [OrderStatus; 9] = [
    OrderStatus::Pending,
    OrderStatus::Confirmed,
    OrderStatus::Processing,
    OrderStatus::ReadyForPickup,
    OrderStatus::OutForDelivery,
    OrderStatus::Delivered,
    OrderStatus::Completed,
    OrderStatus::Cancelled,
    OrderStatus::Refunded,
];

fn any_status() -> impl Strategy<Value = OrderStatus> {
    (0usize..ALL_STATUSES.len()).prop_map(|i| ALL_STATUSES[i])
}

// Money のプロパティベーステスト
proptest! {
    /// Money の加算は交換法則を満たす (a + b = b + a)
    #[test]
    fn test_money_addition_is_commutative(
        amount1 in 0i64..1_000_000,
        amount2 in 0i64..1_000_000,
    ) {
        let money1 = Money::usd(amount1);
        let money2 = Money::usd(amount2);

        let result1 = money1.add(&money2).unwrap();
        let result2 = money2.add(&money1).unwrap();

        prop_assert_eq!(result1, result2);
    }

    /// Money の乗算は分配法則を満たす (a * (b + c) = a * b + a * c)
    #[test]
    fn test_money_multiplication_distributive(
        base_amount in 1i64..10_000,
        factor1 in 1u32..100,
        factor2 in 1u32..100,
    ) {
        let money = Money::usd(base_amount);

        let left_side = money.multiply(factor1 + factor2);
        let right_side = money.multiply(factor1).add(&money.multiply(factor2)).unwrap();

        prop_assert_eq!(left_side, right_side);
    }

    /// クランプ付き減算の結果は常に非負
    #[test]
    fn test_subtract_clamped_is_non_negative(
        amount1 in 0i64..1_000_000,
        amount2 in 0i64..1_000_000,
    ) {
        let result = Money::usd(amount1).subtract_clamped(&Money::usd(amount2));
        prop_assert!(result.amount() >= 0);
    }

    /// パーセント計算(0〜100%)の結果は [0, 元の金額] に収まる
    #[test]
    fn test_percentage_within_bounds(
        amount in 0i64..1_000_000,
        percent in 0i64..=100,
    ) {
        let result = Money::usd(amount).percentage(percent);
        prop_assert!(result.amount() >= 0);
        prop_assert!(result.amount() <= amount);
    }

    /// パーセント計算はセント精度で四捨五入される
    #[test]
    fn test_percentage_rounds_half_up(
        amount in 0i64..1_000_000,
        percent in 0i64..=100,
    ) {
        let result = Money::usd(amount).percentage(percent);
        let expected = (amount * percent + 50) / 100;
        prop_assert_eq!(result.amount(), expected);
    }
}

// OrderItem のプロパティベーステスト
proptest! {
    /// 明細小計は常に単価 × 数量と等しい
    #[test]
    fn test_order_item_subtotal_calculation(
        quantity in 1u32..1000,
        unit_price in 1i64..100_000,
    ) {
        let price = Money::usd(unit_price);
        let item = OrderItem::new(
            ProductId::new(),
            "テスト商品".to_string(),
            quantity,
            price,
        ).unwrap();

        prop_assert_eq!(item.line_subtotal(), price.multiply(quantity));
    }

    /// 数量0の明細は作成できない
    #[test]
    fn test_order_item_zero_quantity_fails(
        unit_price in 1i64..100_000,
    ) {
        let result = OrderItem::new(
            ProductId::new(),
            "テスト商品".to_string(),
            0,
            Money::usd(unit_price),
        );
        prop_assert!(result.is_err());
    }
}

// Cart のプロパティベーステスト
proptest! {
    /// 数量変更後も数量は常に [1, max_quantity] に収まる
    #[test]
    fn test_cart_quantity_stays_within_bounds(
        max_quantity in 1u32..100,
        requested in 1u32..1000,
    ) {
        let mut cart = Cart::new();
        let product_id = ProductId::new();
        cart.add_line(
            InventoryId::new(),
            product_id,
            "テスト商品".to_string(),
            Money::usd(1000),
            max_quantity,
        ).unwrap();

        cart.set_quantity(product_id, requested).unwrap();

        let quantity = cart.lines()[0].quantity();
        prop_assert!(quantity >= 1);
        prop_assert!(quantity <= max_quantity);
    }

    /// 同一商品を何度追加しても明細は1行のまま
    #[test]
    fn test_cart_never_duplicates_lines(
        additions in 1usize..20,
        max_quantity in 1u32..50,
    ) {
        let mut cart = Cart::new();
        let product_id = ProductId::new();
        let inventory_id = InventoryId::new();

        for _ in 0..additions {
            cart.add_line(
                inventory_id,
                product_id,
                "テスト商品".to_string(),
                Money::usd(500),
                max_quantity,
            ).unwrap();
        }

        prop_assert_eq!(cart.lines().len(), 1);
        prop_assert!(cart.lines()[0].quantity() <= max_quantity);
    }

    /// 合計は常に max(0, 小計 − 割引額) と等しい
    #[test]
    fn test_cart_total_formula(
        unit_price in 1i64..10_000,
        quantity in 1u32..50,
        discount in 0i64..1_000_000,
    ) {
        let mut cart = Cart::new();
        let product_id = ProductId::new();
        cart.add_line(
            InventoryId::new(),
            product_id,
            "テスト商品".to_string(),
            Money::usd(unit_price),
            100,
        ).unwrap();
        cart.set_quantity(product_id, quantity).unwrap();

        cart.apply_coupon(AppliedCoupon {
            coupon_id: CouponId::new(),
            code: "TEST".to_string(),
            discount_type: DiscountType::Fixed,
            discount_value: discount,
            discount_amount: Money::usd(discount),
        }).unwrap();

        let expected = (cart.subtotal().amount() - discount).max(0);
        prop_assert_eq!(cart.total().amount(), expected);
    }
}

// Coupon のプロパティベーステスト
proptest! {
    /// 割引額は常に [0, 小計] に収まる(種別・値によらず)
    #[test]
    fn test_coupon_discount_never_exceeds_subtotal(
        subtotal in 0i64..1_000_000,
        discount_value in 0i64..2_000_000,
        is_percentage in any::<bool>(),
    ) {
        let discount_type = if is_percentage {
            DiscountType::Percentage
        } else {
            DiscountType::Fixed
        };
        let coupon = Coupon::new(
            CouponId::new(),
            "TEST".to_string(),
            discount_type,
            discount_value,
            true,
        );

        let discount = coupon.discount_amount(Money::usd(subtotal));
        prop_assert!(discount.amount() >= 0);
        prop_assert!(discount.amount() <= subtotal);
    }
}

// OrderStatus ステートマシンのプロパティベーステスト
proptest! {
    /// cancelled へは非終端ステータスからのみ遷移できる
    #[test]
    fn test_cancellation_allowed_iff_non_terminal(status in any_status()) {
        prop_assert_eq!(
            status.can_transition_to(OrderStatus::Cancelled),
            !status.is_terminal()
        );
    }

    /// 終端ステータスからの遷移は返金を除いて存在しない
    #[test]
    fn test_terminal_states_have_no_successors_except_refund(
        from in any_status(),
        to in any_status(),
    ) {
        if from.is_terminal() && from.can_transition_to(to) {
            // delivered / completed からの返金のみが唯一の例外
            prop_assert!(matches!(
                from,
                OrderStatus::Delivered | OrderStatus::Completed
            ));
            prop_assert_eq!(to, OrderStatus::Refunded);
        }
    }

    /// refunded へは delivered / completed からのみ遷移できる
    #[test]
    fn test_refund_only_from_delivered_or_completed(status in any_status()) {
        let can_refund = status.can_transition_to(OrderStatus::Refunded);
        let expected = matches!(status, OrderStatus::Delivered | OrderStatus::Completed);
        prop_assert_eq!(can_refund, expected);
    }

    /// 自分自身への遷移は存在しない
    #[test]
    fn test_no_self_transitions(status in any_status()) {
        prop_assert!(!status.can_transition_to(status));
    }
}

// OrderNumber のプロパティベーステスト
proptest! {
    /// 生成される注文番号は常に ORD- プレフィックスと下4桁を持つ
    #[test]
    fn test_order_number_format(_dummy in 0u8..10) {
        let number = OrderNumber::generate();
        let s = number.as_str();

        prop_assert!(s.starts_with("ORD-"));
        let parts: Vec<&str> = s.split('-').collect();
        prop_assert_eq!(parts.len(), 3);
        prop_assert_eq!(parts[1].len(), 14); // UTC秒精度タイムスタンプ
        prop_assert_eq!(parts[2].len(), 4);
        prop_assert!(parts[2].chars().all(|c| c.is_ascii_digit()));
    }
}
