//! Localized canned texts (en, af, xh, zu, st). Unknown language codes fall
//! back to English.

use kasibot_core::{Business, BusinessType, Product, Service};

pub fn greeting(language: &str, business_name: &str) -> String {
    match language {
        "af" => format!("Hallo! Welkom by {business_name}. Hoe kan ons jou help vandag?"),
        "xh" => format!("Molo! Wamkelekile e-{business_name}. Singakunceda njani namhlanje?"),
        "zu" => format!("Sawubona! Siyakwamukela e-{business_name}. Singakusiza kanjani namuhla?"),
        "st" => format!("Dumela! Rea u amohela ho {business_name}. Re ka u thusa joang kajeno?"),
        _ => format!("Hello! Welcome to {business_name}. How can we help you today?"),
    }
}

pub fn thanks(language: &str) -> &'static str {
    match language {
        "af" => "Dis 'n plesier! Is daar nog iets waarmee ek kan help?",
        "xh" => "Wamkelekile! Ingaba kukho enye into endinoku kunceda ngayo?",
        "zu" => "Wamukelekile! Ingabe kukhona enye into engingakusiza ngayo?",
        "st" => "O amohetse! Na ho na le tse ling tseo nka u thusang ka tsona?",
        _ => "You're welcome! Is there anything else I can help you with?",
    }
}

pub fn help_text(language: &str, business_type: BusinessType) -> &'static str {
    match (language, business_type) {
        ("af", BusinessType::Barber) => {
            "Hier is wat ek kan help:\n\n• Bekyk dienste en pryse\n• Bespreek 'n afspraak\n• Bekyk bedryfstye\n• Kanselleer bespreking"
        }
        ("af", BusinessType::Carwash) => {
            "Hier is wat ek kan help:\n\n• Bekyk dienste\n• Kyk wagtou status\n• Bespreek 'n slot"
        }
        ("af", BusinessType::Spaza) => {
            "Hier is wat ek kan help:\n\n• Bekyk produkte\n• Plaas bestelling\n• Kyk voorraad"
        }
        ("xh", BusinessType::Barber) => {
            "Nantoni endinoku kunceda ngayo:\n\n• Jonga iinkonzo nemali\n• Bhukisha umhlathi\n• Jonga iiyure zokusebenza"
        }
        ("xh", BusinessType::Carwash) => {
            "Nantoni endinoku kunceda ngayo:\n\n• Jonga iinkonzo\n• Jonga imeko yejanjane"
        }
        ("xh", BusinessType::Spaza) => {
            "Nantoni endinoku kunceda ngayo:\n\n• Jonga iimveliso\n• Beka umyalelo"
        }
        ("zu", BusinessType::Barber) => {
            "Yilokho engingakusiza ngakho:\n\n• Bona izinsiza namaphrizisi\n• Buka isikhathi\n• Buka amahora okusebenza"
        }
        ("zu", BusinessType::Carwash) => {
            "Yilokho engingakusiza ngakho:\n\n• Bona izinsiza\n• Buka isimo sejanjane"
        }
        ("zu", BusinessType::Spaza) => {
            "Yilokho engingakusiza ngakho:\n\n• Bona imikhiqizo\n• Beka i-oda"
        }
        ("st", BusinessType::Barber) => {
            "Ke tseo nka u thusang ka tsona:\n\n• Bona litšebeletso le theko\n• Buka nako\n• Bona lihora tsa tshebetso"
        }
        ("st", BusinessType::Carwash) => {
            "Ke tseo nka u thusang ka tsona:\n\n• Bona litšebeletso\n• Buka boemo ba lethathamo"
        }
        ("st", BusinessType::Spaza) => {
            "Ke tseo nka u thusang ka tsona:\n\n• Bona lihlahisoa\n• Beka taelo"
        }
        (_, BusinessType::Barber) => {
            "Here's what I can help you with:\n\n• View services and prices - reply \"services\"\n• Book an appointment - reply \"book [service] [date] [time]\"\n• View operating hours - reply \"hours\"\n• Cancel booking - reply \"cancel\"\n\nNeed more help? Just ask!"
        }
        (_, BusinessType::Carwash) => {
            "Here's what I can help you with:\n\n• View services and prices - reply \"services\"\n• Check queue status - reply \"queue\"\n• Book a slot - reply \"book [service] [date] [time]\"\n• View operating hours - reply \"hours\"\n\nNeed more help? Just ask!"
        }
        (_, BusinessType::Spaza) => {
            "Here's what I can help you with:\n\n• View products and prices - reply \"menu\"\n• Place an order - reply \"order [items]\"\n• Check stock - reply \"stock [product]\"\n• Delivery info - reply \"delivery\"\n• View operating hours - reply \"hours\"\n\nNeed more help? Just ask!"
        }
    }
}

pub fn booking_usage(language: &str) -> &'static str {
    match language {
        "af" => "Om te bespreek, verskaf asseblief:\n• Diens naam\n• Datum (YYYY-MM-DD)\n• Tyd (HH:MM)\n\nVoorbeeld: \"book haircut 2026-01-15 10:00\"",
        "xh" => "Ukubhukisha, nceda nike:\n• Igama lenkonzo\n• Umhla (YYYY-MM-DD)\n• Ixesha (HH:MM)",
        "zu" => "Ukubhukha, sicela unikeze:\n• Igama lensevisi\n• Usuku (YYYY-MM-DD)\n• Isikhathi (HH:MM)",
        "st" => "Ho buka, ka kopo fana ka:\n• Lebitso la tšebeletso\n• Letsatsi (YYYY-MM-DD)\n• Nako (HH:MM)",
        _ => "To book, please provide:\n• Service name\n• Date (YYYY-MM-DD)\n• Time (HH:MM)\n\nExample: \"book haircut 2026-01-15 10:00\"\n\nOr reply \"services\" to see available services.",
    }
}

pub fn order_usage(language: &str) -> &'static str {
    match language {
        "af" => "Om 'n bestelling te plaas, spesifiseer asseblief items en hoeveelhede.",
        "xh" => "Ukubeka umyalelo, nceda cazulula izinto kunye neembalo.",
        "zu" => "Ukubeka i-oda, sicela unikeze izinto kanye nezinga.",
        "st" => "Ho beha taelo, ka kopo fana ka lihlahisoa le palo.",
        _ => "To place an order, please specify items and quantities.\n\nExample: \"order 2 bread, 1 milk, 3 eggs\"\n\nOr reply \"menu\" to see available products.",
    }
}

pub fn delivery_info(language: &str) -> &'static str {
    match language {
        "af" => "📦 Aflewering Inligting:\n\n• Minimum bestelling: R100\n• Aflewering fooi: R20\n• Aflewering beskikbaar binne 5km radius",
        "xh" => "📦 Ulwazi Lweendleko:\n\n• Umyalelo ophantsi: R100\n• Imali yendleko: R20",
        "zu" => "📦 Ulwazi Lokulethwa:\n\n• Oda eliphansi: R100\n• Imali yokulethwa: R20",
        "st" => "📦 Tlhahisoleseding ea Ho Fetisetsa:\n\n• Taolo e tlase: R100\n• Teefo ea ho fetisetsa: R20",
        _ => "📦 Delivery Information:\n\n• Minimum order: R100\n• Delivery fee: R20\n• Delivery available within 5km radius\n• Same day delivery for orders before 3pm\n\nReply \"order\" to place an order.",
    }
}

/// Services list with prices and durations, titled per business type.
pub fn format_services(language: &str, business_type: BusinessType, services: &[Service]) -> String {
    let title = match (language, business_type) {
        ("af", BusinessType::Carwash) => "🚗 Ons Motorwassery Dienste:",
        ("xh", BusinessType::Carwash) => "🚗 Iinkonzo Zethu Zokuhlamba Iimoto:",
        ("zu", BusinessType::Carwash) => "🚗 Isevisi Zethu Zokugeza Izimoto:",
        ("st", BusinessType::Carwash) => "🚗 Litšebeletso tsa Rona tsa Ho Hlatsoa Koloi:",
        (_, BusinessType::Carwash) => "🚗 Our Car Wash Services:",
        ("af", _) => "✂️ Ons Dienste:",
        ("xh", _) => "✂️ Iinkonzo Zethu:",
        ("zu", _) => "✂️ Isevisi Zethu:",
        ("st", _) => "✂️ Litšebeletso tsa Rona:",
        _ => "✂️ Our Services:",
    };
    let (price_label, duration_label) = match language {
        "af" => ("Prys: R", "Duur:"),
        "xh" => ("Imali: R", "Ixesha:"),
        "zu" => ("Inani: R", "Isikhathi:"),
        "st" => ("Theko: R", "Nako:"),
        _ => ("Price: R", "Duration:"),
    };

    let mut out = format!("{title}\n\n");
    for (i, service) in services.iter().enumerate() {
        out.push_str(&format!("{}. *{}*\n", i + 1, service.name));
        if let Some(desc) = &service.description {
            out.push_str(&format!("   {desc}\n"));
        }
        out.push_str(&format!("   {price_label}{:.2}\n", service.price));
        if let Some(duration) = service.duration_min {
            out.push_str(&format!("   {duration_label} {duration} min\n"));
        }
        out.push('\n');
    }
    out.push_str("\nTo book, reply \"book [service name] [date] [time]\"");
    out.push_str("\nExample: \"book haircut 2026-01-15 10:00\"");
    out
}

/// Product catalog grouped in listing order, stock flagged.
pub fn format_catalog(language: &str, products: &[Product]) -> String {
    let title = match language {
        "af" => "🛒 Ons Produkte:",
        "xh" => "🛒 Iimveliso Zethu:",
        "zu" => "🛒 Imikhiqizo Yethu:",
        "st" => "🛒 Lihlahisoa tsa Rona:",
        _ => "🛒 Our Products:",
    };
    let mut out = format!("{title}\n\n");
    for (i, product) in products.iter().enumerate() {
        let stock_note = if product.in_stock() {
            format!("{} in stock", product.stock)
        } else {
            "out of stock".to_string()
        };
        out.push_str(&format!(
            "{}. *{}* - R{:.2} ({stock_note})\n",
            i + 1,
            product.name,
            product.price
        ));
    }
    out.push_str("\nTo order, reply \"order [quantity] [item]\", e.g. \"order 2 bread, 1 milk\"");
    out
}

pub fn stock_report(language: &str, product: &Product) -> String {
    if product.in_stock() {
        match language {
            "af" => format!(
                "✅ {} is beskikbaar!\n\nPrys: R{:.2}\nVoorraad: {} eenhede",
                product.name, product.price, product.stock
            ),
            "xh" => format!(
                "✅ {} ifumaneka!\n\nImali: R{:.2}\nIsitokhwe: {}",
                product.name, product.price, product.stock
            ),
            "zu" => format!(
                "✅ {} iyatholakala!\n\nInani: R{:.2}\nIsitokhwe: {}",
                product.name, product.price, product.stock
            ),
            "st" => format!(
                "✅ {} e fumaneha!\n\nTheko: R{:.2}\nSefate: {}",
                product.name, product.price, product.stock
            ),
            _ => format!(
                "✅ {} is available!\n\nPrice: R{:.2}\nStock: {} units",
                product.name, product.price, product.stock
            ),
        }
    } else {
        match language {
            "af" => format!("❌ {} is tans uit voorraad.", product.name),
            "xh" => format!("❌ {} ayikho ngoku.", product.name),
            "zu" => format!("❌ {} ayikho njengamanje.", product.name),
            "st" => format!("❌ {} ha e se na hajoale.", product.name),
            _ => format!(
                "❌ {} is currently out of stock.\n\nPrice: R{:.2}\nWe'll restock soon!",
                product.name, product.price
            ),
        }
    }
}

/// Weekly operating-hours table with localized day names.
pub fn format_operating_hours(language: &str, business: &Business) -> String {
    let title = match language {
        "af" => "Ons Bedryfstye:",
        "xh" => "Iiyure Zethu Zokusebenza:",
        "zu" => "Amahora Ethu Okusebenza:",
        "st" => "Lihora la Rona la Tshebetso:",
        _ => "Our Operating Hours:",
    };
    let day_names: [&str; 7] = match language {
        "af" => ["Maandag", "Dinsdag", "Woensdag", "Donderdag", "Vrydag", "Saterdag", "Sondag"],
        "xh" => ["Mvulo", "Lwesibini", "Lwesithathu", "Lwesine", "Lwesihlanu", "Mgqibelo", "Cawe"],
        "zu" => [
            "Msombuluko",
            "Lwesibili",
            "Lwesithathu",
            "Lwesine",
            "Lwesihlanu",
            "Mgqibelo",
            "Sonto",
        ],
        "st" => ["Mantaha", "Labobedi", "Laboraro", "Labone", "Labohlano", "Moqebelo", "Sontaha"],
        _ => [
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
        ],
    };

    use chrono::Weekday::*;
    let days = [Mon, Tue, Wed, Thu, Fri, Sat, Sun];
    let mut out = format!("{title}\n\n");
    for (name, day) in day_names.iter().zip(days) {
        let entry = business.operating_hours.entry_for(day).unwrap_or("Closed");
        out.push_str(&format!("{name}: {entry}\n"));
    }
    out
}
