//! Inbound text normalization and keyword matching.

use regex::Regex;
use std::sync::LazyLock;
use crate::domain::value_objects::Quantity;

static NUMBER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d+").expect("valid regex"));

/// Trims, lowercases and folds `İ`, `I` and `ı` to `i` so Turkish and ASCII
/// spellings of the same keyword compare equal.
pub fn normalize(text: &str) -> String {
    text.trim()
        .chars()
        .flat_map(|c| match c {
            'İ' | 'I' | 'ı' => 'i'.to_lowercase(),
            c => c.to_lowercase(),
        })
        .collect()
}

/// Main menu selection, by number or keyword.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice { Order, ProductInfo, Prices, Support, Unknown }

pub fn is_menu_request(normalized: &str) -> bool {
    matches!(normalized, "menu" | "menü")
}

pub fn menu_choice(normalized: &str) -> MenuChoice {
    if normalized == "1" || normalized.contains("sipariş") {
        MenuChoice::Order
    } else if normalized == "2" || normalized.contains("ürün") {
        MenuChoice::ProductInfo
    } else if normalized == "3" || normalized.contains("fiyat") {
        MenuChoice::Prices
    } else if normalized == "4" || normalized.contains("destek") {
        MenuChoice::Support
    } else {
        MenuChoice::Unknown
    }
}

/// A quantity menu pick (`1`..`4`) or a free-form amount such as `5 adet`.
pub fn quantity_choice(normalized: &str) -> Option<Quantity> {
    if let n @ ("1" | "2" | "3" | "4") = normalized {
        return n.parse().ok().and_then(|n| Quantity::new(n).ok());
    }
    if !normalized.contains("adet") {
        return None;
    }
    NUMBER
        .find(normalized)
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .and_then(|n| Quantity::new(n).ok())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision { Confirm, Cancel }

pub fn decision(normalized: &str) -> Option<Decision> {
    match normalized {
        "evet" | "e" | "onay" => Some(Decision::Confirm),
        "hayir" | "h" | "iptal" => Some(Decision::Cancel),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(" Evet "), "evet");
        assert_eq!(normalize("EVET"), "evet");
        assert_eq!(normalize("HAYIR"), "hayir");
        assert_eq!(normalize("hayır"), "hayir");
        assert_eq!(normalize("İPTAL"), "iptal");
        assert_eq!(normalize("SİPARİŞ"), "sipariş");
        assert_eq!(normalize("\tMENÜ\n"), "menü");
    }

    #[test]
    fn test_menu_choice() {
        assert_eq!(menu_choice("1"), MenuChoice::Order);
        assert_eq!(menu_choice(&normalize("Sipariş vermek istiyorum")), MenuChoice::Order);
        assert_eq!(menu_choice(&normalize("SİPARİŞ")), MenuChoice::Order);
        assert_eq!(menu_choice("2"), MenuChoice::ProductInfo);
        assert_eq!(menu_choice(&normalize("Ürün hakkında bilgi")), MenuChoice::ProductInfo);
        assert_eq!(menu_choice("3"), MenuChoice::Prices);
        assert_eq!(menu_choice("fiyatı ne kadar"), MenuChoice::Prices);
        assert_eq!(menu_choice("4"), MenuChoice::Support);
        assert_eq!(menu_choice("destek lazım"), MenuChoice::Support);
        assert_eq!(menu_choice("merhaba"), MenuChoice::Unknown);
        assert_eq!(menu_choice("5"), MenuChoice::Unknown);
    }

    #[test]
    fn test_quantity_choice() {
        assert_eq!(quantity_choice("2").map(|q| q.value()), Some(2));
        assert_eq!(quantity_choice("4").map(|q| q.value()), Some(4));
        assert_eq!(quantity_choice("5 adet").map(|q| q.value()), Some(5));
        assert_eq!(quantity_choice("adet: 12 lütfen").map(|q| q.value()), Some(12));
        assert_eq!(quantity_choice("5"), None);
        assert_eq!(quantity_choice("0 adet"), None);
        assert_eq!(quantity_choice("birkaç adet"), None);
        assert_eq!(quantity_choice("99999999999 adet"), None);
        assert_eq!(quantity_choice("1000 adet").map(|q| q.value()), Some(1000));
        assert_eq!(quantity_choice("1001 adet"), None);
        assert_eq!(quantity_choice("4000000000 adet"), None);
    }

    #[test]
    fn test_decision() {
        assert_eq!(decision("evet"), Some(Decision::Confirm));
        assert_eq!(decision("e"), Some(Decision::Confirm));
        assert_eq!(decision("onay"), Some(Decision::Confirm));
        assert_eq!(decision(&normalize("Hayır")), Some(Decision::Cancel));
        assert_eq!(decision("h"), Some(Decision::Cancel));
        assert_eq!(decision("iptal"), Some(Decision::Cancel));
        assert_eq!(decision("belki"), None);
    }
}
