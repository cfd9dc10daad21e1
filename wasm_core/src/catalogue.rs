//! Static tool catalogue and per-tool documentation records.

use serde::Serialize;

use crate::ai::AiTool;
use crate::context::Locale;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    Calculators,
    Converters,
    Developer,
    Text,
    Generators,
    Randomizers,
    Productivity,
    Ai,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Self::Calculators,
        Self::Converters,
        Self::Developer,
        Self::Text,
        Self::Generators,
        Self::Randomizers,
        Self::Productivity,
        Self::Ai,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawKind {
    Picker,
    Wheel,
}

/// What powers a tool page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "tool", rename_all = "lowercase")]
pub enum Engine {
    Local,
    Draw(DrawKind),
    Generative(AiTool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub engine: Engine,
}

pub static TOOLS: &[ToolEntry] = &[
    ToolEntry {
        id: "age-calculator",
        name: "Age Calculator",
        category: Category::Calculators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "bmi-calculator",
        name: "BMI Calculator",
        category: Category::Calculators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "percentage-calculator",
        name: "Percentage Calculator",
        category: Category::Calculators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "loan-calculator",
        name: "Loan Calculator",
        category: Category::Calculators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "mortgage-calculator",
        name: "Mortgage Calculator",
        category: Category::Calculators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "compound-interest",
        name: "Compound Interest Calculator",
        category: Category::Calculators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "tip-calculator",
        name: "Tip Calculator",
        category: Category::Calculators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "discount-calculator",
        name: "Discount Calculator",
        category: Category::Calculators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "vat-calculator",
        name: "VAT Calculator",
        category: Category::Calculators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "gpa-calculator",
        name: "GPA Calculator",
        category: Category::Calculators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "date-difference",
        name: "Date Difference",
        category: Category::Calculators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "fuel-cost-calculator",
        name: "Fuel Cost Calculator",
        category: Category::Calculators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "calorie-calculator",
        name: "Calorie Calculator",
        category: Category::Calculators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "salary-calculator",
        name: "Salary Calculator",
        category: Category::Calculators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "unit-converter",
        name: "Unit Converter",
        category: Category::Converters,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "currency-converter",
        name: "Currency Converter",
        category: Category::Converters,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "temperature-converter",
        name: "Temperature Converter",
        category: Category::Converters,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "time-zone-converter",
        name: "Time Zone Converter",
        category: Category::Converters,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "number-base-converter",
        name: "Number Base Converter",
        category: Category::Converters,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "roman-numerals",
        name: "Roman Numeral Converter",
        category: Category::Converters,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "color-converter",
        name: "Color Converter",
        category: Category::Converters,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "image-converter",
        name: "Image Converter",
        category: Category::Converters,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "csv-to-json",
        name: "CSV to JSON",
        category: Category::Converters,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "json-flattener",
        name: "JSON Flattener",
        category: Category::Developer,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "json-formatter",
        name: "JSON Formatter",
        category: Category::Developer,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "base64-encoder",
        name: "Base64 Encoder",
        category: Category::Developer,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "url-encoder",
        name: "URL Encoder",
        category: Category::Developer,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "jwt-decoder",
        name: "JWT Decoder",
        category: Category::Developer,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "hash-generator",
        name: "Hash Generator",
        category: Category::Developer,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "uuid-generator",
        name: "UUID Generator",
        category: Category::Developer,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "regex-tester",
        name: "Regex Tester",
        category: Category::Developer,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "bst-visualizer",
        name: "Binary Search Tree Visualizer",
        category: Category::Developer,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "html-minifier",
        name: "HTML Minifier",
        category: Category::Developer,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "css-minifier",
        name: "CSS Minifier",
        category: Category::Developer,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "markdown-preview",
        name: "Markdown Preview",
        category: Category::Developer,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "word-counter",
        name: "Word Counter",
        category: Category::Text,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "case-converter",
        name: "Case Converter",
        category: Category::Text,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "text-reverser",
        name: "Text Reverser",
        category: Category::Text,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "remove-duplicate-lines",
        name: "Remove Duplicate Lines",
        category: Category::Text,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "sort-lines",
        name: "Sort Lines",
        category: Category::Text,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "lorem-ipsum",
        name: "Lorem Ipsum Generator",
        category: Category::Text,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "slug-generator",
        name: "Slug Generator",
        category: Category::Text,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "text-diff",
        name: "Text Diff",
        category: Category::Text,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "morse-code",
        name: "Morse Code Translator",
        category: Category::Text,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "find-and-replace",
        name: "Find and Replace",
        category: Category::Text,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "whitespace-remover",
        name: "Whitespace Remover",
        category: Category::Text,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "password-generator",
        name: "Password Generator",
        category: Category::Generators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "qr-code-generator",
        name: "QR Code Generator",
        category: Category::Generators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "barcode-generator",
        name: "Barcode Generator",
        category: Category::Generators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "username-generator",
        name: "Username Generator",
        category: Category::Generators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "random-number",
        name: "Random Number Generator",
        category: Category::Randomizers,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "random-picker",
        name: "Random Winner Picker",
        category: Category::Randomizers,
        engine: Engine::Draw(DrawKind::Picker),
    },
    ToolEntry {
        id: "spin-wheel",
        name: "Spin the Wheel",
        category: Category::Randomizers,
        engine: Engine::Draw(DrawKind::Wheel),
    },
    ToolEntry {
        id: "coin-flip",
        name: "Coin Flip",
        category: Category::Randomizers,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "dice-roller",
        name: "Dice Roller",
        category: Category::Randomizers,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "team-generator",
        name: "Random Team Generator",
        category: Category::Randomizers,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "yes-no-oracle",
        name: "Yes or No Oracle",
        category: Category::Randomizers,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "notepad",
        name: "Online Notepad",
        category: Category::Productivity,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "invoice-generator",
        name: "Invoice Generator",
        category: Category::Productivity,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "pomodoro-timer",
        name: "Pomodoro Timer",
        category: Category::Productivity,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "stopwatch",
        name: "Stopwatch",
        category: Category::Productivity,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "countdown-timer",
        name: "Countdown Timer",
        category: Category::Productivity,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "todo-list",
        name: "To-Do List",
        category: Category::Productivity,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "habit-tracker",
        name: "Habit Tracker",
        category: Category::Productivity,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "meta-tag-generator",
        name: "Meta Tag Generator",
        category: Category::Productivity,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "grammar-fixer",
        name: "Grammar Fixer",
        category: Category::Ai,
        engine: Engine::Generative(AiTool::GrammarFixer),
    },
    ToolEntry {
        id: "ai-humanizer",
        name: "AI Text Humanizer",
        category: Category::Ai,
        engine: Engine::Generative(AiTool::Humanizer),
    },
    ToolEntry {
        id: "paraphraser",
        name: "Paraphrasing Tool",
        category: Category::Ai,
        engine: Engine::Generative(AiTool::Paraphraser),
    },
    ToolEntry {
        id: "summarizer",
        name: "Text Summarizer",
        category: Category::Ai,
        engine: Engine::Generative(AiTool::Summarizer),
    },
    ToolEntry {
        id: "seo-optimizer",
        name: "SEO Title & Description",
        category: Category::Ai,
        engine: Engine::Generative(AiTool::SeoOptimizer),
    },
    ToolEntry {
        id: "ai-detector",
        name: "AI Content Detector",
        category: Category::Ai,
        engine: Engine::Generative(AiTool::AiDetector),
    },
    ToolEntry {
        id: "headline-generator",
        name: "Headline Generator",
        category: Category::Ai,
        engine: Engine::Generative(AiTool::HeadlineGenerator),
    },
    ToolEntry {
        id: "hashtag-generator",
        name: "Hashtag Generator",
        category: Category::Ai,
        engine: Engine::Generative(AiTool::HashtagGenerator),
    },
    ToolEntry {
        id: "email-writer",
        name: "Email Writer",
        category: Category::Ai,
        engine: Engine::Generative(AiTool::EmailWriter),
    },
    ToolEntry {
        id: "product-description",
        name: "Product Description Writer",
        category: Category::Ai,
        engine: Engine::Generative(AiTool::ProductDescription),
    },
    ToolEntry {
        id: "image-caption",
        name: "Image Caption Generator",
        category: Category::Ai,
        engine: Engine::Generative(AiTool::ImageCaption),
    },
    ToolEntry {
        id: "image-to-text",
        name: "Image to Text",
        category: Category::Ai,
        engine: Engine::Generative(AiTool::ImageToText),
    },
    ToolEntry {
        id: "color-palette",
        name: "Color Palette Generator",
        category: Category::Generators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "favicon-generator",
        name: "Favicon Generator",
        category: Category::Generators,
        engine: Engine::Local,
    },
    ToolEntry {
        id: "typing-test",
        name: "Typing Speed Test",
        category: Category::Productivity,
        engine: Engine::Local,
    },
];

pub fn find_tool(id: &str) -> Option<&'static ToolEntry> {
    let id = id.trim();
    TOOLS.iter().find(|tool| tool.id.eq_ignore_ascii_case(id))
}

pub fn tools_in(category: Category) -> impl Iterator<Item = &'static ToolEntry> {
    TOOLS.iter().filter(move |tool| tool.category == category)
}

/// Tool count per category, in index-page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub category: Category,
    pub count: usize,
}

pub fn category_summaries() -> Vec<CategorySummary> {
    Category::ALL
        .iter()
        .map(|&category| CategorySummary {
            category,
            count: tools_in(category).count(),
        })
        .collect()
}

/// Case-insensitive substring match on id and name.
pub fn search(query: &str) -> Vec<&'static ToolEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return TOOLS.iter().collect();
    }
    TOOLS
        .iter()
        .filter(|tool| tool.id.contains(&needle) || tool.name.to_lowercase().contains(&needle))
        .collect()
}

/// Documentation shown under a tool, resolved once when the page is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDoc {
    pub about: String,
    pub usage: String,
    pub benefits: String,
    pub faq: String,
}

struct DocTemplate {
    about: &'static str,
    usage_local: &'static str,
    usage_draw: &'static str,
    usage_generative: &'static str,
    benefits: &'static str,
    faq: &'static str,
}

fn template(locale: Locale) -> DocTemplate {
    match locale {
        Locale::En => DocTemplate {
            about: "{name} is a free tool that runs in your browser.",
            usage_local: "Enter your values and {name} updates the result instantly.",
            usage_draw: "Enter one entry per line, then start the draw to reveal a random result.",
            usage_generative: "Paste your text, choose an option if available, and press Generate.",
            benefits: "No sign-up, no installation, and your input stays on this page.",
            faq: "Is {name} free? Yes, every tool in the catalogue is free to use.",
        },
        Locale::Es => DocTemplate {
            about: "{name} es una herramienta gratuita que funciona en tu navegador.",
            usage_local: "Introduce tus valores y {name} actualiza el resultado al instante.",
            usage_draw: "Escribe una entrada por línea y empieza el sorteo para ver un resultado al azar.",
            usage_generative: "Pega tu texto, elige una opción si existe y pulsa Generar.",
            benefits: "Sin registro ni instalación; tus datos se quedan en esta página.",
            faq: "¿{name} es gratis? Sí, todas las herramientas son gratuitas.",
        },
        Locale::Fr => DocTemplate {
            about: "{name} est un outil gratuit qui fonctionne dans votre navigateur.",
            usage_local: "Saisissez vos valeurs et {name} met le résultat à jour immédiatement.",
            usage_draw: "Saisissez une entrée par ligne puis lancez le tirage pour révéler un résultat.",
            usage_generative: "Collez votre texte, choisissez une option si besoin et cliquez sur Générer.",
            benefits: "Sans inscription ni installation ; vos données restent sur cette page.",
            faq: "{name} est-il gratuit ? Oui, tous les outils sont gratuits.",
        },
        Locale::De => DocTemplate {
            about: "{name} ist ein kostenloses Werkzeug, das in deinem Browser läuft.",
            usage_local: "Gib deine Werte ein und {name} zeigt das Ergebnis sofort an.",
            usage_draw: "Gib einen Eintrag pro Zeile ein und starte die Ziehung für ein zufälliges Ergebnis.",
            usage_generative: "Füge deinen Text ein, wähle bei Bedarf eine Option und klicke auf Erzeugen.",
            benefits: "Ohne Anmeldung und Installation; deine Eingaben bleiben auf dieser Seite.",
            faq: "Ist {name} kostenlos? Ja, alle Werkzeuge sind kostenlos.",
        },
    }
}

impl ToolDoc {
    pub fn resolve(tool: &ToolEntry, locale: Locale) -> Self {
        let tpl = template(locale);
        let fill = |text: &str| text.replace("{name}", tool.name);
        let usage = match tool.engine {
            Engine::Local => tpl.usage_local,
            Engine::Draw(_) => tpl.usage_draw,
            Engine::Generative(_) => tpl.usage_generative,
        };
        Self {
            about: fill(tpl.about),
            usage: fill(usage),
            benefits: fill(tpl.benefits),
            faq: fill(tpl.faq),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn ids_are_unique_and_url_safe() {
        let mut seen = HashSet::new();
        for tool in TOOLS {
            assert!(seen.insert(tool.id), "duplicate id {}", tool.id);
            assert!(
                tool.id
                    .chars()
                    .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'),
                "id {} is not a slug",
                tool.id
            );
        }
        assert_eq!(TOOLS.len(), 80);
    }

    #[test]
    fn every_generative_tool_is_listed_once() {
        for ai in AiTool::ALL {
            let count = TOOLS
                .iter()
                .filter(|tool| tool.engine == Engine::Generative(ai))
                .count();
            assert_eq!(count, 1, "{ai:?}");
        }
        assert_eq!(tools_in(Category::Ai).count(), AiTool::ALL.len());
    }

    #[test]
    fn find_and_search() {
        assert_eq!(find_tool("SPIN-WHEEL").map(|t| t.name), Some("Spin the Wheel"));
        assert!(find_tool("nope").is_none());
        let hits = search("calc");
        assert!(hits.iter().all(|t| t.category == Category::Calculators));
        assert!(hits.len() >= 10);
        assert_eq!(search("").len(), TOOLS.len());
    }

    #[test]
    fn docs_fill_tool_name_per_locale() {
        let wheel = find_tool("spin-wheel").unwrap();
        let en = ToolDoc::resolve(wheel, Locale::En);
        assert_eq!(en.about, "Spin the Wheel is a free tool that runs in your browser.");
        assert!(en.usage.contains("one entry per line"));
        let de = ToolDoc::resolve(wheel, Locale::De);
        assert!(de.faq.starts_with("Ist Spin the Wheel kostenlos?"));
        for locale in Locale::ALL {
            let doc = ToolDoc::resolve(wheel, locale);
            assert!(!doc.about.contains("{name}"));
        }
    }
}
