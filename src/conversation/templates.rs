//! Reply templates (Turkish).

use std::fmt::Write;
use crate::domain::value_objects::{price_for, CustomerInfo, Money, Quantity, BULK_UNIT_PRICE, MAX_QUANTITY};

/// Sent by the webhook when anything goes wrong while handling a message.
pub const APOLOGY: &str = "Üzgünüz, bir hata oluştu. Lütfen daha sonra tekrar deneyin.";

pub const PRODUCT_NAME: &str = "Oxiva Burun Bandı";

/// Store contact details shown in replies.
#[derive(Clone, Debug)]
pub struct Storefront {
    pub support_phone: String,
    pub support_email: String,
}

impl Default for Storefront {
    fn default() -> Self {
        Self { support_phone: "0850 000 00 00".to_string(), support_email: "destek@oxiva.com.tr".to_string() }
    }
}

/// Every reply the conversation can send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Welcome,
    OrderStart,
    ProductInfo,
    SupportContact,
    AskCustomerInfo { quantity: Quantity },
    InvalidQuantity,
    MissingCustomerInfo,
    OrderSummary { quantity: Quantity, customer: CustomerInfo, total: Money },
    ConfirmReminder { quantity: Quantity, customer: CustomerInfo, total: Money },
    OrderConfirmed { order_number: String },
    OrderCancelled,
    OrderFailed,
}

impl Reply {
    pub fn render(&self, store: &Storefront) -> String {
        match self {
            Self::Welcome => format!(
                "Merhaba! 👋 {PRODUCT_NAME} WhatsApp hattına hoş geldiniz.\n\n\
                 Size nasıl yardımcı olabiliriz?\n\n\
                 1️⃣ Sipariş vermek\n2️⃣ Ürün bilgisi\n3️⃣ Fiyatlar\n4️⃣ Destek\n\n\
                 Lütfen bir numara yazın."
            ),
            Self::OrderStart => format!("🛒 Kaç adet sipariş vermek istersiniz?\n\n{}", quantity_menu()),
            Self::ProductInfo => format!(
                "ℹ️ *{PRODUCT_NAME}*\n\n\
                 Burun kanatlarını nazikçe açarak uykuda ve sporda daha rahat nefes almanızı sağlar. \
                 Cilt dostu, hipoalerjenik yapıştırıcı; her bant tek kullanımlıktır.\n\n\
                 💰 *Fiyatlar*\n{}\n\n\
                 Sipariş vermek için *1* yazın.",
                price_list()
            ),
            Self::SupportContact => format!(
                "📞 *Destek*\n\n\
                 Telefon: {}\nE-posta: {}\n\n\
                 Hafta içi 09:00-18:00 arası size yardımcı olmaktan memnuniyet duyarız.\n\
                 Ana menü için *menü* yazın.",
                store.support_phone, store.support_email
            ),
            Self::AskCustomerInfo { quantity } => format!(
                "✅ {quantity} adet seçtiniz ({}).\n\n{}",
                price_for(*quantity),
                info_format()
            ),
            Self::InvalidQuantity => format!(
                "⚠️ Miktarı anlayamadık.\n\n{}",
                quantity_menu()
            ),
            Self::MissingCustomerInfo => format!(
                "⚠️ Bilgileriniz eksik görünüyor.\n\n{}",
                info_format()
            ),
            Self::OrderSummary { quantity, customer, total } => format!(
                "{}\n\nSiparişi onaylıyor musunuz? (*EVET* / *HAYIR*)",
                summary(*quantity, customer, total)
            ),
            Self::ConfirmReminder { quantity, customer, total } => format!(
                "Lütfen siparişi onaylamak için *EVET*, iptal etmek için *HAYIR* yazın.\n\n{}",
                summary(*quantity, customer, total)
            ),
            Self::OrderConfirmed { order_number } => format!(
                "🎉 Siparişiniz alındı!\n\n\
                 Sipariş No: *{order_number}*\n\n\
                 Siparişiniz en kısa sürede kargoya verilecektir. Teşekkür ederiz!"
            ),
            Self::OrderCancelled => "❌ Siparişiniz iptal edildi.\n\nYeni bir sipariş için *menü* yazabilirsiniz.".to_string(),
            Self::OrderFailed => "⚠️ Siparişiniz şu anda kaydedilemedi. Lütfen birkaç dakika sonra tekrar *EVET* yazın.".to_string(),
        }
    }
}

fn quantity_menu() -> String {
    let mut out = String::new();
    for (q, emoji) in menu_quantities().zip(["1️⃣", "2️⃣", "3️⃣", "4️⃣"]) {
        let _ = writeln!(out, "{emoji} {q} Adet - {}", price_for(q));
    }
    let _ = write!(out, "\nFarklı bir miktar için örneğin *5 adet* yazabilirsiniz (en fazla {MAX_QUANTITY}).");
    out
}

fn price_list() -> String {
    let mut out = String::new();
    for q in menu_quantities().take(3) {
        let _ = writeln!(out, "{q} Adet: {}", price_for(q));
    }
    let _ = write!(out, "4 ve üzeri: adet başı {}", Money::lira(BULK_UNIT_PRICE.into()));
    out
}

fn menu_quantities() -> impl Iterator<Item = Quantity> {
    (1..=4).filter_map(|n| Quantity::new(n).ok())
}

fn info_format() -> &'static str {
    "Lütfen teslimat bilgilerinizi *tek mesajda*, her biri ayrı satırda olacak şekilde gönderin:\n\n\
     Ad Soyad\nTelefon\nAdres\nİl/İlçe"
}

fn summary(quantity: Quantity, customer: &CustomerInfo, total: &Money) -> String {
    format!(
        "📋 *Sipariş Özeti*\n\n\
         Ürün: {PRODUCT_NAME}\nAdet: {quantity}\nTutar: {total}\n\n\
         👤 {}\n📞 {}\n📍 {}\n🏙️ {}",
        customer.name, customer.phone, customer.address, customer.city
    )
}
