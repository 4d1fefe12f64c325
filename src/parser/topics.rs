//! Keyword-based topic tagging of question stems.
//!
//! Rules are checked in table order and the first match wins, so a stem
//! never receives more than one subtopic.

pub const LAW: &str = "Prawo";
pub const FINANCIAL_MATH: &str = "Matematyka Finansowa";

#[derive(Debug, Clone, Copy)]
pub struct TopicRule {
    /// Lowercase substrings; any one of them triggers the rule.
    pub triggers: &'static [&'static str],
    pub label: &'static str,
}

const fn rule(triggers: &'static [&'static str], label: &'static str) -> TopicRule {
    TopicRule { triggers, label }
}

/// Phrases that mark a question as a legal one.
pub const LAW_TRIGGERS: &[&str] = &["zgodnie z", "z ustawą"];

pub const LAW_RULES: &[TopicRule] = &[
    rule(&["zasadami etyki zawodowej maklerów"], "Zasady Etyki Zawodowej Maklerów i Doradców"),
    rule(
        &["szczegółowymi zasadami obrotu giełdowego", "systemie utp"],
        "Szczegółowe Zasady Obrotu Giełdowego",
    ),
    rule(&["regulaminem giełdy"], "Regulamin Giełdy"),
    rule(&["ustawą kodeks spółek handlowych"], "Kodeks Spółek Handlowych"),
    rule(&["ustawą o obligacjach"], "Ustawa o Obligacjach"),
    rule(&["ustawą o ofercie publicznej"], "Ustawa o Ofercie Publicznej"),
    rule(
        &["ustawą o obrocie instrumentami finansowymi"],
        "Ustawa o Obrocie Instrumentami Finansowymi",
    ),
    rule(&["rozporządzeniem delegowanym komisji (ue) 2017/565"], "Rozporządzenie UE 2017/565"),
    rule(&["rozporządzeniem ministra finansów"], "Rozporządzenie Ministra Finansów"),
    rule(
        &[
            "rozporządzeniem parlamentu europejskiego i rady (ue) nr 596/2014",
            "nadużyć na rynku",
        ],
        "Rozporządzenie UE 596/2014 (MAR)",
    ),
    rule(&["ustawą o rachunkowości"], "Ustawa o Rachunkowości"),
    rule(&["ustawą o funduszach inwestycyjnych"], "Ustawa o Funduszach Inwestycyjnych"),
    rule(
        &["ustawą o nadzorze nad rynkiem finansowym"],
        "Ustawa o Nadzorze nad Rynkiem Finansowym",
    ),
    rule(
        &["ustawą o przeciwdziałaniu praniu pieniędzy", "ustawą aml"],
        "Ustawa o Przeciwdziałaniu Praniu Pieniędzy (AML)",
    ),
    rule(&["ustawą o giełdach towarowych"], "Ustawa o Giełdach Towarowych"),
    rule(&["kodeks cywilny"], "Kodeks Cywilny"),
];

pub const MATH_RULES: &[TopicRule] = &[
    rule(&["kredyt", "pożyczka"], "Kredyty"),
    rule(&["obligacj"], "Obligacje"),
    rule(&["ryzyko"], "Analiza Ryzyka"),
    rule(&["wycena"], "Wycena Instrumentów Finansowych"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topics {
    pub main_topic: Vec<String>,
    pub sub_topic: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct TopicClassifier {
    law_triggers: &'static [&'static str],
    law_rules: &'static [TopicRule],
    math_rules: &'static [TopicRule],
}

impl Default for TopicClassifier {
    fn default() -> Self {
        TopicClassifier {
            law_triggers: LAW_TRIGGERS,
            law_rules: LAW_RULES,
            math_rules: MATH_RULES,
        }
    }
}

impl TopicClassifier {
    pub fn classify(&self, stem: &str) -> Topics {
        let q = stem.to_lowercase();
        let is_law = self.law_triggers.iter().any(|t| q.contains(t));
        let (main, rules) = if is_law {
            (LAW, self.law_rules)
        } else {
            (FINANCIAL_MATH, self.math_rules)
        };

        Topics {
            main_topic: vec![main.to_string()],
            sub_topic: first_match(rules, &q).map(str::to_string).into_iter().collect(),
        }
    }
}

fn first_match(rules: &[TopicRule], lowered: &str) -> Option<&'static str> {
    rules
        .iter()
        .find(|r| r.triggers.iter().any(|t| lowered.contains(t)))
        .map(|r| r.label)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(stem: &str) -> Topics {
        TopicClassifier::default().classify(stem)
    }

    #[test]
    fn bonds_act() {
        let t = classify("Zgodnie z Ustawą o Obligacjach emitent może:");
        assert_eq!(t.main_topic, vec!["Prawo"]);
        assert_eq!(t.sub_topic, vec!["Ustawa o Obligacjach"]);
    }

    #[test]
    fn earlier_rule_wins() {
        // matches both the exchange regulations and the civil code rules
        let t = classify("Zgodnie z regulaminem giełdy oraz ustawą kodeks cywilny:");
        assert_eq!(t.sub_topic, vec!["Regulamin Giełdy"]);
    }

    #[test]
    fn alternative_trigger() {
        let t = classify("Zgodnie z przepisami, w systemie UTP zlecenie...");
        assert_eq!(t.sub_topic, vec!["Szczegółowe Zasady Obrotu Giełdowego"]);
        let t = classify("W związku z ustawą AML instytucja obowiązana:");
        assert_eq!(t.main_topic, vec!["Prawo"]);
        assert_eq!(t.sub_topic, vec!["Ustawa o Przeciwdziałaniu Praniu Pieniędzy (AML)"]);
    }

    #[test]
    fn law_without_known_source() {
        let t = classify("Zgodnie z prawem wekslowym:");
        assert_eq!(t.main_topic, vec!["Prawo"]);
        assert!(t.sub_topic.is_empty());
    }

    #[test]
    fn financial_math_rules() {
        assert_eq!(classify("Oblicz ratę kredytu").sub_topic, vec!["Kredyty"]);
        assert_eq!(classify("Cena obligacji zerokuponowej").sub_topic, vec!["Obligacje"]);
        assert_eq!(classify("Ryzyko portfela wynosi").sub_topic, vec!["Analiza Ryzyka"]);
        assert_eq!(
            classify("Wycena akcji metodą DDM").sub_topic,
            vec!["Wycena Instrumentów Finansowych"]
        );
        // credit is checked before bonds
        assert_eq!(classify("Kredyt zabezpieczony obligacją").sub_topic, vec!["Kredyty"]);
    }

    #[test]
    fn financial_math_default() {
        let t = classify("Ile wynosi stopa zwrotu?");
        assert_eq!(t.main_topic, vec!["Matematyka Finansowa"]);
        assert!(t.sub_topic.is_empty());
    }

    #[test]
    fn custom_tables() {
        static RULES: &[TopicRule] = &[rule(&["opcj"], "Opcje")];
        let c = TopicClassifier {
            law_triggers: &["na podstawie"],
            law_rules: &[],
            math_rules: RULES,
        };
        assert_eq!(c.classify("Na podstawie ustawy o obligacjach").main_topic, vec!["Prawo"]);
        assert_eq!(c.classify("Wartość opcji call").sub_topic, vec!["Opcje"]);
    }

    #[test]
    fn every_rule_has_a_trigger() {
        assert_eq!(LAW_RULES.len(), 16);
        for r in LAW_RULES.iter().chain(MATH_RULES) {
            assert!(!r.triggers.is_empty(), "{}", r.label);
            assert!(r.triggers.iter().all(|t| *t == t.to_lowercase()), "{}", r.label);
        }
    }
}
