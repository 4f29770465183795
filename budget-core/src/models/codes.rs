//! Option codes selected on the form.
//!
//! Each table is closed: codes outside the known set map to one explicit
//! fallback variant instead of failing.
//!
//! | Table           | Fallback |
//! |-----------------|----------|
//! | [`Tone`]          | [`Tone::Professional`] |
//! | [`ServiceType`]   | [`ServiceType::Other`] carrying the raw code |
//! | [`PaymentMethod`] | [`PaymentMethod::ToBeArranged`] |
//! | [`DeliveryType`]  | [`DeliveryType::ToBeArranged`] |

use serde::{Deserialize, Serialize};

/// Writing tone of the greeting, introduction and closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tone {
    #[default]
    Professional,
    Friendly,
    Formal,
    Creative,
    Technical,
    Sales,
}

impl Tone {
    pub fn all() -> &'static [Tone] {
        &[
            Tone::Professional,
            Tone::Friendly,
            Tone::Formal,
            Tone::Creative,
            Tone::Technical,
            Tone::Sales,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Professional => "profissional",
            Self::Friendly => "amigavel",
            Self::Formal => "formal",
            Self::Creative => "criativo",
            Self::Technical => "tecnico",
            Self::Sales => "vendas",
        }
    }

    /// Unknown codes resolve to [`Tone::Professional`].
    pub fn parse(code: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|tone| tone.code() == code.trim())
            .unwrap_or_default()
    }
}

impl From<String> for Tone {
    fn from(code: String) -> Self {
        Self::parse(&code)
    }
}

impl From<Tone> for String {
    fn from(tone: Tone) -> Self {
        tone.code().to_string()
    }
}

/// Kind of service being quoted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ServiceType {
    WebDevelopment,
    MobileDevelopment,
    GraphicDesign,
    DigitalMarketing,
    Consulting,
    Maintenance,
    ECommerce,
    Seo,
    #[default]
    Custom,
    /// A code outside the catalog; shown verbatim in the document.
    Other(String),
}

impl ServiceType {
    pub fn known() -> &'static [ServiceType] {
        &[
            ServiceType::WebDevelopment,
            ServiceType::MobileDevelopment,
            ServiceType::GraphicDesign,
            ServiceType::DigitalMarketing,
            ServiceType::Consulting,
            ServiceType::Maintenance,
            ServiceType::ECommerce,
            ServiceType::Seo,
            ServiceType::Custom,
        ]
    }

    pub fn code(&self) -> &str {
        match self {
            Self::WebDevelopment => "desenvolvimento-web",
            Self::MobileDevelopment => "desenvolvimento-mobile",
            Self::GraphicDesign => "design-grafico",
            Self::DigitalMarketing => "marketing-digital",
            Self::Consulting => "consultoria",
            Self::Maintenance => "manutencao",
            Self::ECommerce => "e-commerce",
            Self::Seo => "seo",
            Self::Custom => "personalizado",
            Self::Other(raw) => raw,
        }
    }

    pub fn parse(code: &str) -> Self {
        let code = code.trim();
        Self::known()
            .iter()
            .find(|service| service.code() == code)
            .cloned()
            .unwrap_or_else(|| Self::Other(code.to_string()))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Description printed under "Tipo de Serviço"; unknown codes print as-is.
    pub fn label(&self) -> &str {
        match self {
            Self::WebDevelopment => "💻 Desenvolvimento de soluções web personalizadas e responsivas",
            Self::MobileDevelopment => "📱 Desenvolvimento de aplicativos mobile nativos e híbridos",
            Self::GraphicDesign => "🎨 Criação de identidade visual e materiais gráficos profissionais",
            Self::DigitalMarketing => "📈 Estratégias de marketing digital e presença online",
            Self::Consulting => "💼 Consultoria especializada e assessoria técnica",
            Self::Maintenance => "🔧 Serviços de manutenção e suporte técnico especializado",
            Self::ECommerce => "🛒 Desenvolvimento de lojas virtuais e soluções de e-commerce",
            Self::Seo => "🔍 Otimização para mecanismos de busca e marketing de conteúdo",
            Self::Custom => "⚡ Serviços personalizados conforme necessidade específica",
            Self::Other(raw) => raw,
        }
    }
}

impl From<String> for ServiceType {
    fn from(code: String) -> Self {
        Self::parse(&code)
    }
}

impl From<ServiceType> for String {
    fn from(service: ServiceType) -> Self {
        service.code().to_string()
    }
}

/// Payment terms offered to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PaymentMethod {
    #[default]
    Upfront,
    Installments,
    HalfAndHalf,
    ThirtySeventy,
    Custom,
    ToBeArranged,
}

impl PaymentMethod {
    pub fn all() -> &'static [PaymentMethod] {
        &[
            PaymentMethod::Upfront,
            PaymentMethod::Installments,
            PaymentMethod::HalfAndHalf,
            PaymentMethod::ThirtySeventy,
            PaymentMethod::Custom,
            PaymentMethod::ToBeArranged,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Upfront => "a-vista",
            Self::Installments => "parcelado",
            Self::HalfAndHalf => "50-50",
            Self::ThirtySeventy => "30-70",
            Self::Custom => "personalizado",
            Self::ToBeArranged => "a-combinar",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Upfront => "À vista com 5% de desconto",
            Self::Installments => "Parcelado em até 12x no cartão",
            Self::HalfAndHalf => "50% na assinatura + 50% na entrega",
            Self::ThirtySeventy => "30% na assinatura + 70% na entrega",
            Self::Custom => "Condições personalizadas a combinar",
            Self::ToBeArranged => "A combinar",
        }
    }

    /// Unknown codes resolve to [`PaymentMethod::ToBeArranged`].
    pub fn parse(code: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|method| method.code() == code.trim())
            .unwrap_or(Self::ToBeArranged)
    }
}

impl From<String> for PaymentMethod {
    fn from(code: String) -> Self {
        Self::parse(&code)
    }
}

impl From<PaymentMethod> for String {
    fn from(method: PaymentMethod) -> Self {
        method.code().to_string()
    }
}

/// How the finished work is handed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeliveryType {
    #[default]
    Digital,
    InPerson,
    Hybrid,
    ToBeArranged,
}

impl DeliveryType {
    pub fn all() -> &'static [DeliveryType] {
        &[
            DeliveryType::Digital,
            DeliveryType::InPerson,
            DeliveryType::Hybrid,
            DeliveryType::ToBeArranged,
        ]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Digital => "digital",
            Self::InPerson => "presencial",
            Self::Hybrid => "hibrido",
            Self::ToBeArranged => "a-combinar",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Digital => "Entrega digital via e-mail/plataforma online",
            Self::InPerson => "Entrega presencial com apresentação",
            Self::Hybrid => "Entrega digital + apresentação presencial opcional",
            Self::ToBeArranged => "A combinar",
        }
    }

    /// Unknown codes resolve to [`DeliveryType::ToBeArranged`].
    pub fn parse(code: &str) -> Self {
        Self::all()
            .iter()
            .copied()
            .find(|delivery| delivery.code() == code.trim())
            .unwrap_or(Self::ToBeArranged)
    }
}

impl From<String> for DeliveryType {
    fn from(code: String) -> Self {
        Self::parse(&code)
    }
}

impl From<DeliveryType> for String {
    fn from(delivery: DeliveryType) -> Self {
        delivery.code().to_string()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn tone_codes_round_trip() {
        for tone in Tone::all() {
            assert_eq!(Tone::parse(tone.code()), *tone);
        }
    }

    #[test]
    fn unknown_tone_falls_back_to_professional() {
        assert_eq!(Tone::parse("sarcastico"), Tone::Professional);
    }

    #[test]
    fn service_codes_round_trip() {
        for service in ServiceType::known() {
            assert_eq!(ServiceType::parse(service.code()), *service);
        }
    }

    #[test]
    fn unknown_service_keeps_raw_code() {
        let service = ServiceType::parse("fotografia");

        assert_eq!(service, ServiceType::Other("fotografia".to_string()));
        assert_eq!(service.code(), "fotografia");
        assert!(!service.is_known());
    }

    #[test]
    fn unknown_payment_and_delivery_fall_back_to_be_arranged() {
        assert_eq!(PaymentMethod::parse("boleto"), PaymentMethod::ToBeArranged);
        assert_eq!(DeliveryType::parse("correio"), DeliveryType::ToBeArranged);
    }

    #[test]
    fn labels_describe_known_codes_and_echo_unknown_ones() {
        assert_eq!(
            ServiceType::Seo.label(),
            "🔍 Otimização para mecanismos de busca e marketing de conteúdo"
        );
        assert_eq!(ServiceType::parse("podcast").label(), "podcast");
        assert_eq!(PaymentMethod::parse("boleto").label(), "A combinar");
        assert_eq!(DeliveryType::Hybrid.label(), "Entrega digital + apresentação presencial opcional");
    }

    #[test]
    fn codes_serialize_as_strings() {
        let json = serde_json::to_string(&(Tone::Creative, PaymentMethod::HalfAndHalf))
            .expect("serialize codes");

        assert_eq!(json, r#"["criativo","50-50"]"#);
    }

    #[test]
    fn service_type_deserializes_unknown_codes() {
        let service: ServiceType =
            serde_json::from_str(r#""podcast""#).expect("deserialize service");

        assert_eq!(service, ServiceType::Other("podcast".to_string()));
    }
}
