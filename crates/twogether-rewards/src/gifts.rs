//! Gift catalog: the built-in gifts every couple starts with, merged with
//! the ones they add themselves.

use twogether_types::models::{Gift, GiftCategory};

struct BuiltinGift {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    cost: i64,
    category: GiftCategory,
    icon: &'static str,
}

const BUILTIN_GIFTS: [BuiltinGift; 6] = [
    BuiltinGift {
        id: "massage",
        title: "Full body massage",
        description: "A 30 minute massage",
        cost: 1500,
        category: GiftCategory::Service,
        icon: "💆",
    },
    BuiltinGift {
        id: "dinner",
        title: "Romantic dinner",
        description: "A home-cooked dinner for two",
        cost: 2000,
        category: GiftCategory::Service,
        icon: "🍽️",
    },
    BuiltinGift {
        id: "movie_night",
        title: "Movie night",
        description: "A favorite movie with snacks",
        cost: 800,
        category: GiftCategory::Experience,
        icon: "🎬",
    },
    BuiltinGift {
        id: "oral_service",
        title: "Special service",
        description: "You know the one",
        cost: 3000,
        category: GiftCategory::Intimate,
        icon: "💋",
    },
    BuiltinGift {
        id: "babysitting",
        title: "Two hours off",
        description: "Your partner looks after the kids for two hours",
        cost: 2500,
        category: GiftCategory::Service,
        icon: "👶",
    },
    BuiltinGift {
        id: "shopping",
        title: "Shopping fund",
        description: "A shopping budget of 500",
        cost: 5000,
        category: GiftCategory::Physical,
        icon: "💰",
    },
];

impl BuiltinGift {
    fn to_gift(&self) -> Gift {
        Gift {
            id: self.id.to_string(),
            title: self.title.to_string(),
            description: self.description.to_string(),
            cost: self.cost,
            category: self.category,
            icon: self.icon.to_string(),
            is_custom: false,
            created_by: None,
        }
    }
}

pub fn builtin_gifts() -> Vec<Gift> {
    BUILTIN_GIFTS.iter().map(BuiltinGift::to_gift).collect()
}

pub fn is_builtin(id: &str) -> bool {
    BUILTIN_GIFTS.iter().any(|g| g.id == id)
}

/// Built-in gifts first, then the couple's own in the order given.
pub fn catalog(custom: Vec<Gift>) -> Vec<Gift> {
    let mut gifts = builtin_gifts();
    gifts.extend(custom);
    gifts
}

pub fn find_gift(custom: &[Gift], id: &str) -> Option<Gift> {
    BUILTIN_GIFTS
        .iter()
        .find(|g| g.id == id)
        .map(BuiltinGift::to_gift)
        .or_else(|| custom.iter().find(|g| g.id == id).cloned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(id: &str, cost: i64) -> Gift {
        Gift {
            id: id.into(),
            title: "Breakfast in bed".into(),
            description: String::new(),
            cost,
            category: GiftCategory::Service,
            icon: "🥞".into(),
            is_custom: true,
            created_by: None,
        }
    }

    #[test]
    fn builtin_prices() {
        let prices: Vec<(String, i64)> = builtin_gifts().into_iter().map(|g| (g.id, g.cost)).collect();
        assert_eq!(
            prices,
            vec![
                ("massage".to_string(), 1500),
                ("dinner".to_string(), 2000),
                ("movie_night".to_string(), 800),
                ("oral_service".to_string(), 3000),
                ("babysitting".to_string(), 2500),
                ("shopping".to_string(), 5000),
            ]
        );
        assert!(builtin_gifts().iter().all(|g| !g.is_custom));
    }

    #[test]
    fn catalog_appends_custom_gifts() {
        let gifts = catalog(vec![custom("c1", 400)]);
        assert_eq!(gifts.len(), 7);
        assert_eq!(gifts[6].id, "c1");
    }

    #[test]
    fn lookup_prefers_builtin_ids() {
        let own = vec![custom("massage", 1), custom("c1", 400)];
        assert_eq!(find_gift(&own, "massage").unwrap().cost, 1500);
        assert_eq!(find_gift(&own, "c1").unwrap().cost, 400);
        assert!(find_gift(&own, "yacht").is_none());
        assert!(is_builtin("shopping"));
        assert!(!is_builtin("c1"));
    }
}
