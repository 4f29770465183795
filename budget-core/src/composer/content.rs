//! Fixed proposal wording.

use crate::{DeliveryType, Tone};

pub const VERSION: &str = "2024.1";
pub const PRODUCT_NAME: &str = "IA Orçamentos Pro";
pub const VALIDITY_DAYS: i64 = 30;
pub const CHECK_MARK: &str = "✅";

/// Greeting, introduction and closing for one tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToneStyle {
    pub greeting: &'static str,
    pub intro: &'static str,
    pub closing: &'static str,
}

pub fn tone_style(tone: Tone) -> ToneStyle {
    match tone {
        Tone::Professional => ToneStyle {
            greeting: "Prezado(a)",
            intro: "Apresentamos nossa proposta comercial para o projeto solicitado, desenvolvida com base em nossa experiência e expertise técnica.",
            closing: "Aguardamos seu retorno e ficamos à disposição para esclarecimentos adicionais.",
        },
        Tone::Friendly => ToneStyle {
            greeting: "Olá",
            intro: "Ficamos muito felizes com seu interesse! Preparamos uma proposta especial pensada especialmente para você e suas necessidades.",
            closing: "Estamos ansiosos para trabalhar juntos e criar algo incrível! Qualquer dúvida, é só chamar. 😊",
        },
        Tone::Formal => ToneStyle {
            greeting: "Ilustríssimo(a) Senhor(a)",
            intro: "Vimos por meio desta apresentar nossa proposta comercial conforme solicitado, elaborada de acordo com os mais altos padrões de qualidade.",
            closing: "Colocamo-nos à disposição para quaisquer esclarecimentos que se fizerem necessários e aguardamos vossa manifestação.",
        },
        Tone::Creative => ToneStyle {
            greeting: "Ei",
            intro: "🚀 Que tal transformarmos suas ideias em realidade? Aqui está nossa proposta criativa, cheia de inovação e personalidade!",
            closing: "✨ Vamos criar algo incrível juntos? Estamos prontos para começar essa jornada criativa com você!",
        },
        Tone::Technical => ToneStyle {
            greeting: "Prezado(a)",
            intro: "Segue proposta técnica detalhada baseada em análise de requisitos e melhores práticas do mercado.",
            closing: "Disponibilizamos nossa equipe técnica para discussão de especificações e esclarecimentos.",
        },
        Tone::Sales => ToneStyle {
            greeting: "Prezado(a)",
            intro: "Esta é uma oportunidade única! Preparamos uma proposta exclusiva com condições especiais para seu projeto.",
            closing: "Não perca esta oportunidade! Entre em contato hoje mesmo e garante condições especiais.",
        },
    }
}

/// The six checklist entries of "O QUE ESTÁ INCLUSO".
pub fn inclusions(support_days: u32) -> [String; 6] {
    [
        "Planejamento e análise detalhada".to_string(),
        "Desenvolvimento/execução do projeto".to_string(),
        "Testes e validação completa".to_string(),
        "Entrega e treinamento".to_string(),
        format!("Suporte pós-entrega ({support_days} dias)"),
        "Garantia de qualidade".to_string(),
    ]
}

/// The seven entries of "OBSERVAÇÕES IMPORTANTES".
pub fn observations(
    delivery: DeliveryType,
    support_days: u32,
) -> [String; 7] {
    [
        format!("Esta proposta é válida por {VALIDITY_DAYS} dias corridos"),
        "Valores sujeitos a alteração após este período".to_string(),
        "Início dos trabalhos mediante aprovação e sinal de 30%".to_string(),
        "Alterações no escopo podem gerar custos adicionais".to_string(),
        format!("Entrega: {}", delivery.label()),
        format!("Suporte técnico gratuito por {support_days} dias após entrega"),
        "Todos os direitos autorais serão transferidos após pagamento integral".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_tone_has_a_style() {
        for tone in Tone::all() {
            let style = tone_style(*tone);
            assert!(!style.greeting.is_empty());
            assert!(!style.intro.is_empty());
            assert!(!style.closing.is_empty());
        }
    }

    #[test]
    fn support_days_appear_in_inclusions_and_observations() {
        assert_eq!(inclusions(45)[4], "Suporte pós-entrega (45 dias)");
        assert_eq!(
            observations(DeliveryType::InPerson, 45)[4..6],
            [
                "Entrega: Entrega presencial com apresentação".to_string(),
                "Suporte técnico gratuito por 45 dias após entrega".to_string(),
            ]
        );
    }
}
