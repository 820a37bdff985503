//! Compiled-in content for every editable page section.
//!
//! These documents seed the store on first visit and are what visitors see
//! whenever the API is unreachable. Text leaves are `{fr, en}` pairs; image
//! paths, icons and figures are plain values shared by both locales.

use serde_json::{json, Value};

use crate::section::PageSection;

pub const HERO: &str = "hero";
pub const ABOUT: &str = "about";
pub const DINING: &str = "dining";
pub const EVENTS: &str = "events";
pub const CONTACT: &str = "contact";
pub const FOOTER: &str = "footer";

pub const KEYS: [&str; 6] = [HERO, ABOUT, DINING, EVENTS, CONTACT, FOOTER];

pub fn hero() -> Value {
    json!({
        "slides": [
            {
                "id": "welcome",
                "title": {"fr": "Bienvenue", "en": "Welcome"},
                "subtitle": {
                    "fr": "Au cœur d'Antananarivo, face au lac Anosy",
                    "en": "In the heart of Antananarivo, overlooking Lake Anosy"
                },
                "image": "/uploads/hero-facade.jpg"
            },
            {
                "id": "pool",
                "title": {"fr": "Détente au bord de la piscine", "en": "Unwind by the pool"},
                "subtitle": {
                    "fr": "Une oasis de calme au centre-ville",
                    "en": "A haven of calm downtown"
                },
                "image": "/uploads/hero-pool.jpg"
            }
        ],
        "cta": {
            "label": {"fr": "Réserver", "en": "Book now"},
            "href": "/booking"
        }
    })
}

pub fn about() -> Value {
    json!({
        "title": {"fr": "Notre histoire", "en": "Our story"},
        "body": {
            "fr": "Depuis plus de cinquante ans, le Carlton accueille voyageurs et délégations au cœur de la capitale malgache.",
            "en": "For more than fifty years the Carlton has welcomed travellers and delegations to the heart of Madagascar's capital."
        },
        "image": "/uploads/about-lobby.jpg",
        "stats": [
            {"id": "rooms", "value": 171, "label": {"fr": "Chambres et suites", "en": "Rooms and suites"}},
            {"id": "venues", "value": 12, "label": {"fr": "Salles de réunion", "en": "Meeting rooms"}},
            {"id": "restaurants", "value": 3, "label": {"fr": "Restaurants et bars", "en": "Restaurants and bars"}}
        ]
    })
}

pub fn dining() -> Value {
    json!({
        "title": {"fr": "Restaurants et bars", "en": "Restaurants and bars"},
        "intro": {
            "fr": "Cuisine malgache et internationale, du petit-déjeuner au dîner.",
            "en": "Malagasy and international cuisine, from breakfast to dinner."
        },
        "venues": [
            {
                "id": "le-bistrot",
                "name": "Le Bistrot",
                "hours": {"fr": "Tous les jours, 6h30 à 22h30", "en": "Daily, 6:30am to 10:30pm"},
                "image": "/uploads/dining-bistrot.jpg"
            },
            {
                "id": "pool-bar",
                "name": "Pool Bar",
                "hours": {"fr": "Tous les jours, 10h à 19h", "en": "Daily, 10am to 7pm"},
                "image": "/uploads/dining-pool-bar.jpg"
            }
        ]
    })
}

pub fn events() -> Value {
    json!({
        "title": {"fr": "Événements et réunions", "en": "Events and meetings"},
        "body": {
            "fr": "Des salles modulables pour vos séminaires, conférences et réceptions.",
            "en": "Flexible rooms for your seminars, conferences and receptions."
        },
        "capacity": 600,
        "image": "/uploads/events-ballroom.jpg"
    })
}

pub fn contact() -> Value {
    json!({
        "title": {"fr": "Nous contacter", "en": "Contact us"},
        "address": "Rue Pierre Stibbe, Anosy, Antananarivo 101, Madagascar",
        "phone": "+261 20 22 260 60",
        "email": "reservation@carlton.mg",
        "hours": {"fr": "Réception ouverte 24h/24", "en": "Front desk open 24/7"}
    })
}

pub fn footer() -> Value {
    json!({
        "tagline": {"fr": "L'hospitalité malgache depuis 1970", "en": "Malagasy hospitality since 1970"},
        "links": [
            {"id": "rooms", "label": {"fr": "Chambres", "en": "Rooms"}, "href": "/rooms"},
            {"id": "dining", "label": {"fr": "Restauration", "en": "Dining"}, "href": "/dining"},
            {"id": "contact", "label": {"fr": "Contact", "en": "Contact"}, "href": "/contact"}
        ],
        "copyright": {"fr": "Tous droits réservés", "en": "All rights reserved"}
    })
}

/// The default document for a section key.
pub fn for_key(key: &str) -> Option<Value> {
    let document = match key {
        HERO => hero(),
        ABOUT => about(),
        DINING => dining(),
        EVENTS => events(),
        CONTACT => contact(),
        FOOTER => footer(),
        _ => return None,
    };
    Some(document)
}

pub fn page_section(key: &str) -> Option<PageSection> {
    for_key(key).map(|defaults| PageSection::new(key, defaults))
}
