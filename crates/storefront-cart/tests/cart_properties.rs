//! Property tests for cart invariants and persistence
use proptest::prelude::*;
use std::collections::{BTreeMap, HashSet};
use storefront_cart::{Cart, CartEngine, CartItem, CartStore, MemoryStorage};

fn arb_cart() -> impl Strategy<Value = Cart> {
    prop::collection::btree_map(
        "[A-Za-z][A-Za-z0-9 ]{0,12}",
        ("[0-9]{1,4}(\\.[0-9]{2})?", "/media/[a-z]{1,8}\\.png", 1u32..50),
        0..8,
    )
    .prop_map(|entries: BTreeMap<String, (String, String, u32)>| {
        let items = entries
            .into_iter()
            .map(|(name, (price, image, qty))| {
                CartItem::new(name, price, image).with_quantity(qty).unwrap()
            })
            .collect();
        Cart::try_from_items(items).unwrap()
    })
}

fn arb_names() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop_oneof![Just("Hammer"), Just("Nails"), Just("Saw"), Just("Glue")], 0..30)
        .prop_map(|names| names.into_iter().map(String::from).collect())
}

proptest! {
    #[test]
    fn prop_save_then_load_is_identity(cart in arb_cart()) {
        let store = CartStore::new(MemoryStorage::new());
        store.save(&cart).unwrap();
        prop_assert_eq!(store.load(), cart);
    }

    #[test]
    fn prop_load_never_fails_on_arbitrary_data(raw in ".*") {
        let store = CartStore::new(MemoryStorage::with_item("cart", &raw));
        let cart = store.load();
        let unique: HashSet<&str> = cart.iter().map(|i| i.name.as_str()).collect();
        prop_assert_eq!(unique.len(), cart.len());
    }

    #[test]
    fn prop_adds_dedupe_and_count(names in arb_names()) {
        let mut engine = CartEngine::load(CartStore::new(MemoryStorage::new()));
        for name in &names {
            engine.add_item(name.as_str(), "10", "").unwrap();
        }

        let mut first_seen: Vec<&str> = Vec::new();
        for name in &names {
            if !first_seen.contains(&name.as_str()) {
                first_seen.push(name);
            }
        }

        let actual: Vec<&str> = engine.cart().iter().map(|i| i.name.as_str()).collect();
        prop_assert_eq!(actual, first_seen);
        prop_assert_eq!(engine.total_quantity(), names.len() as u64);
        prop_assert!(engine.cart().iter().all(|i| i.quantity() >= 1));
    }

    #[test]
    fn prop_remove_shrinks_by_one(cart in arb_cart(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!cart.is_empty());
        let storage = MemoryStorage::new();
        let store = CartStore::new(storage.clone());
        store.save(&cart).unwrap();

        let mut engine = CartEngine::load(store.clone());
        let index = pick.index(cart.len());
        engine.remove_item(index).unwrap();

        let mut expected: Vec<CartItem> = cart.items().to_vec();
        expected.remove(index);
        prop_assert_eq!(engine.cart().items(), expected.as_slice());
        prop_assert_eq!(&store.load(), engine.cart());
    }
}
