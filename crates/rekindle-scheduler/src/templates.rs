//! Message templates — a fixed ordered set per (language, intent) pair.
//! Selection is uniformly random and independent per firing; repeats across
//! firings are acceptable because firings are at least a day apart.

use rand::Rng;

use rekindle_core::{Language, MessageIntent};

/// The configured template set for a (language, intent) pair. Every pair has
/// at least three variants.
pub fn templates(language: Language, intent: MessageIntent) -> &'static [&'static str] {
    use Language::*;
    use MessageIntent::*;
    match (language, intent) {
        (English, Morning) => &[
            "Good morning! Hope your day is as bright as your smile.",
            "Morning! Wishing you a wonderful day ahead.",
            "Rise and shine! Sending positive vibes your way.",
        ],
        (English, Night) => &[
            "Good night! Sweet dreams and rest well.",
            "Sleep tight! May tomorrow be a great day for you.",
            "Night! Hope you drift off to peaceful dreams.",
        ],
        (English, MissYou) => &[
            "Hey there! Just thinking of you and sending hugs.",
            "Hello! I miss you, hope to see you soon.",
            "Missing you! Hope you're doing well.",
        ],
        (Arabic, Morning) => &[
            "صباح الخير! أتمنى لك يومًا جميلًا.",
            "صباح النور! أرسل لك أجمل الأمنيات ليومك.",
            "صباح الورد! أتمنى أن يكون يومك مليئًا بالسعادة.",
        ],
        (Arabic, Night) => &[
            "تصبح على خير! أحلام سعيدة.",
            "ليلة سعيدة! أتمنى لك نومًا هانئًا.",
            "تصبح على خير! أتمنى لك راحة وطمأنينة.",
        ],
        (Arabic, MissYou) => &[
            "أفتقدك! أتمنى أن أراك قريبًا.",
            "أهلاً! أشتاق إليك كثيرًا.",
            "أفكر فيك، أتمنى أن تكون بخير.",
        ],
        (French, Morning) => &[
            "Bonjour! Passe une merveilleuse journée.",
            "Salut! Je te souhaite un bon matin.",
            "Coucou! Que ta journée soit belle et lumineuse.",
        ],
        (French, Night) => &[
            "Bonne nuit! Fais de beaux rêves.",
            "Dors bien! À demain.",
            "Bonne nuit! Que ton sommeil soit doux.",
        ],
        (French, MissYou) => &[
            "Tu me manques! J'espère te voir bientôt.",
            "Salut! Je pense à toi et tu me manques.",
            "Je t'envoie des pensées, tu me manques beaucoup.",
        ],
    }
}

/// Pick one template uniformly at random. No cross-invocation memory.
pub fn select(language: Language, intent: MessageIntent, rng: &mut impl Rng) -> &'static str {
    let set = templates(language, intent);
    set[rng.gen_range(0..set.len())]
}
