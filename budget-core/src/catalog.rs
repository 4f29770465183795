//! Quick presets, writing suggestions and sample data for the form.

use crate::ServiceType;
use crate::collector::{FieldId, RawForm};

/// Quick-start presets that fill the service block of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Preset {
    Web,
    Mobile,
    Design,
    Marketing,
}

impl Preset {
    pub fn all() -> &'static [Preset] {
        &[Preset::Web, Preset::Mobile, Preset::Design, Preset::Marketing]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Mobile => "mobile",
            Self::Design => "design",
            Self::Marketing => "marketing",
        }
    }

    pub fn parse(code: &str) -> Option<Self> {
        Self::all()
            .iter()
            .copied()
            .find(|preset| preset.as_str() == code.trim())
    }

    pub fn service_type(&self) -> ServiceType {
        match self {
            Self::Web => ServiceType::WebDevelopment,
            Self::Mobile => ServiceType::MobileDevelopment,
            Self::Design => ServiceType::GraphicDesign,
            Self::Marketing => ServiceType::DigitalMarketing,
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Web => {
                "Desenvolvimento de website responsivo com design moderno, sistema de gerenciamento de conteúdo, otimização SEO e integração com redes sociais."
            }
            Self::Mobile => {
                "Desenvolvimento de aplicativo mobile nativo para iOS e Android com interface intuitiva, sistema de login e integração com APIs."
            }
            Self::Design => {
                "Criação de identidade visual completa incluindo logotipo, cartão de visita, papel timbrado e manual de marca."
            }
            Self::Marketing => {
                "Estratégia completa de marketing digital incluindo gestão de redes sociais, criação de conteúdo e campanhas pagas."
            }
        }
    }

    /// Project value as typed into the form.
    pub fn value(&self) -> &'static str {
        match self {
            Self::Web => "3500",
            Self::Mobile => "8000",
            Self::Design => "1500",
            Self::Marketing => "2000",
        }
    }

    /// Deadline in business days, as typed into the form.
    pub fn deadline(&self) -> &'static str {
        match self {
            Self::Web => "20",
            Self::Mobile => "45",
            Self::Design => "10",
            Self::Marketing => "30",
        }
    }

    /// Overwrites service type, description, value and deadline.
    pub fn apply(
        &self,
        raw: &mut RawForm,
    ) {
        raw.set(FieldId::ServiceType, self.service_type().code());
        raw.set(FieldId::ProjectDescription, self.description());
        raw.set(FieldId::ProjectValue, self.value());
        raw.set(FieldId::ProjectDeadline, self.deadline());
    }
}

const GENERIC_SUGGESTIONS: [&str; 6] = [
    "💡 Detalhe melhor o escopo do projeto",
    "⏰ Considere prazos realistas",
    "💰 Pesquise valores de mercado",
    "📋 Liste todos os entregáveis",
    "🎯 Defina objetivos específicos",
    "📞 Agende reunião de alinhamento",
];

/// Writing tips for the selected service; other services get generic tips.
pub fn suggestions(service: &ServiceType) -> &'static [&'static str] {
    match service {
        ServiceType::WebDevelopment => &[
            "💡 Considere incluir certificado SSL gratuito",
            "📱 Adicione responsividade mobile (obrigatória)",
            "🔍 Inclua otimização básica de SEO",
            "📊 Considere integração com Google Analytics",
            "🚀 Adicione otimização de velocidade",
            "🔒 Implemente sistema de backup automático",
        ],
        ServiceType::MobileDevelopment => &[
            "📱 Defina claramente as plataformas (iOS/Android)",
            "🔔 Considere sistema de notificações push",
            "💾 Planeje o armazenamento offline",
            "🔐 Implemente autenticação segura",
            "📈 Adicione analytics de uso",
            "🧪 Inclua testes em dispositivos reais",
        ],
        ServiceType::GraphicDesign => &[
            "🎨 Inclua variações da logo em diferentes formatos",
            "📐 Considere criar um guia de estilo completo",
            "🖼️ Adicione mockups para apresentação",
            "📱 Crie versões para redes sociais",
            "🖨️ Prepare arquivos para impressão",
            "🎯 Defina aplicações da marca",
        ],
        ServiceType::DigitalMarketing => &[
            "📈 Defina KPIs claros para mensuração",
            "🎯 Segmente bem o público-alvo",
            "📅 Crie um cronograma de postagens",
            "💰 Reserve budget para impulsionamento",
            "📊 Planeje relatórios mensais",
            "🔄 Defina estratégia de remarketing",
        ],
        _ => &GENERIC_SUGGESTIONS,
    }
}

/// Which half of the identity block to fill with sample data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleParty {
    Company,
    Client,
}

impl SampleParty {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "company" | "empresa" => Some(Self::Company),
            "client" | "cliente" => Some(Self::Client),
            _ => None,
        }
    }
}

pub fn fill_sample(
    raw: &mut RawForm,
    party: SampleParty,
) {
    match party {
        SampleParty::Company => {
            raw.set(FieldId::CompanyName, "TechSolutions Pro Ltda");
            raw.set(FieldId::CompanyPhone, "(11) 99999-8888");
            raw.set(FieldId::CompanyEmail, "contato@techsolutions.pro");
            raw.set(FieldId::CompanyAddress, "Rua das Inovações, 123 - São Paulo/SP");
            raw.set(FieldId::CompanyCnpj, "12.345.678/0001-90");
        }
        SampleParty::Client => {
            raw.set(FieldId::ClientName, "João Silva Santos");
            raw.set(FieldId::ClientPhone, "(11) 88888-7777");
            raw.set(FieldId::ClientEmail, "joao.silva@empresaabc.com.br");
            raw.set(FieldId::ClientCompany, "Empresa ABC Inovações Ltda");
        }
    }
}

/// Form shown on first start, when there is no autosave snapshot.
pub fn initial_form() -> RawForm {
    RawForm::new()
        .with(FieldId::CompanyName, "TechSolutions Pro")
        .with(FieldId::CompanyEmail, "contato@techsolutions.pro")
        .with(FieldId::ClientName, "João Silva")
        .with(FieldId::ClientEmail, "joao@empresa.com")
        .with(
            FieldId::ProjectDescription,
            "Desenvolvimento de website institucional responsivo com sistema de gerenciamento de conteúdo.",
        )
        .with(FieldId::ProjectValue, "2500")
        .with(FieldId::ProjectDeadline, "15")
}
