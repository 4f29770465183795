//! Document Composer.
//!
//! Renders a [`FormState`] into the styled HTML proposal. Composition is
//! pure: the only ambient input, the current time, arrives through
//! [`ComposeContext`].

pub mod content;

use std::fmt;

use chrono::{DateTime, Datelike, Duration, Local};

use crate::calculations::PricingSummary;
use crate::calculations::common::{format_brl, format_percent};
use crate::{BudgetDocument, FormState, LineItem};

use content::{CHECK_MARK, PRODUCT_NAME, VALIDITY_DAYS, VERSION, inclusions, observations, tone_style};

/// Ambient values a proposal depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeContext {
    pub now: DateTime<Local>,
}

impl ComposeContext {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now }
    }

    pub fn current() -> Self {
        Self::new(Local::now())
    }

    /// `dd/mm/yyyy`
    pub fn today(&self) -> String {
        self.now.format("%d/%m/%Y").to_string()
    }

    pub fn valid_until(&self) -> String {
        (self.now + Duration::days(VALIDITY_DAYS))
            .format("%d/%m/%Y")
            .to_string()
    }

    /// Last six digits of the millisecond timestamp.
    pub fn pseudo_id(&self) -> String {
        format!("{:06}", self.now.timestamp_millis().rem_euclid(1_000_000))
    }
}

/// Renders the proposal for `form`.
pub fn compose(
    form: &FormState,
    ctx: &ComposeContext,
) -> BudgetDocument {
    let pricing = PricingSummary::from_form(form);
    tracing::debug!(
        total = %pricing.total_value,
        discount = %pricing.discount_value,
        final_value = %pricing.final_value,
        "composing proposal"
    );
    let proposal = Proposal {
        form,
        ctx,
        pricing: &pricing,
    };
    BudgetDocument::new(proposal.to_string())
}

/// Escapes text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    Escaped(text).to_string()
}

struct Escaped<'a>(&'a str);

impl fmt::Display for Escaped<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        for ch in self.0.chars() {
            match ch {
                '&' => f.write_str("&amp;")?,
                '<' => f.write_str("&lt;")?,
                '>' => f.write_str("&gt;")?,
                '"' => f.write_str("&quot;")?,
                '\'' => f.write_str("&#39;")?,
                _ => fmt::Write::write_char(f, ch)?,
            }
        }
        Ok(())
    }
}

struct Brl(rust_decimal::Decimal);

impl fmt::Display for Brl {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "R$ {}", format_brl(self.0))
    }
}

const CARD: &str = "background: white; border: 2px solid #e9ecef; border-radius: 20px; padding: 40px; margin-bottom: 40px; box-shadow: 0 10px 30px rgba(0,0,0,0.08);";
const INFO_PANEL: &str = "background: linear-gradient(135deg, #f8f9fa 0%, #e9ecef 100%); padding: 30px; border-radius: 20px; box-shadow: 0 8px 25px rgba(0,0,0,0.08);";
const INFO_ROW: &str = "margin: 12px 0; display: flex; justify-content: space-between;";
const CELL: &str = "padding: 15px; border: 1px solid #dee2e6;";

struct Proposal<'a> {
    form: &'a FormState,
    ctx: &'a ComposeContext,
    pricing: &'a PricingSummary,
}

impl Proposal<'_> {
    fn header(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let form = self.form;
        writeln!(
            f,
            r#"<header style="text-align: center; margin-bottom: 40px; padding: 40px; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; border-radius: 20px;">"#
        )?;
        writeln!(
            f,
            r#"<h1 style="margin: 0 0 15px 0; font-size: 36px; font-weight: bold;">{}</h1>"#,
            Escaped(&form.company_name)
        )?;
        write!(
            f,
            r#"<div style="font-size: 18px; margin-bottom: 20px;">📞 {} | 📧 {}"#,
            Escaped(&form.company_phone),
            Escaped(&form.company_email)
        )?;
        if !form.company_address.trim().is_empty() {
            write!(f, "<br>📍 {}", Escaped(&form.company_address))?;
        }
        if !form.company_cnpj.trim().is_empty() {
            write!(f, "<br>🏢 CNPJ: {}", Escaped(&form.company_cnpj))?;
        }
        writeln!(f, "</div>")?;
        writeln!(
            f,
            r#"<div style="display: inline-block; background: rgba(255,255,255,0.2); padding: 10px 20px; border-radius: 25px;"><strong>PROPOSTA COMERCIAL PROFISSIONAL</strong></div>"#
        )?;
        writeln!(f, "</header>")
    }

    fn info_block(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let form = self.form;
        writeln!(
            f,
            r#"<div style="display: grid; grid-template-columns: 1fr 1fr; gap: 30px; margin-bottom: 40px;">"#
        )?;

        writeln!(f, r#"<div style="{INFO_PANEL} border-left: 5px solid #667eea;">"#)?;
        writeln!(f, r#"<h4 style="margin-top: 0; color: #667eea; font-size: 20px;">📅 Informações do Orçamento</h4>"#)?;
        writeln!(f, r#"<p style="{INFO_ROW}"><strong>Data:</strong> <span>{}</span></p>"#, self.ctx.today())?;
        writeln!(f, r#"<p style="{INFO_ROW}"><strong>Válido até:</strong> <span>{}</span></p>"#, self.ctx.valid_until())?;
        writeln!(f, r#"<p style="{INFO_ROW}"><strong>Orçamento:</strong> <span>#{}</span></p>"#, self.ctx.pseudo_id())?;
        writeln!(f, r#"<p style="{INFO_ROW}"><strong>Versão:</strong> <span>{VERSION}</span></p>"#)?;
        writeln!(f, "</div>")?;

        writeln!(f, r#"<div style="{INFO_PANEL} border-left: 5px solid #28a745;">"#)?;
        writeln!(f, r#"<h4 style="margin-top: 0; color: #28a745; font-size: 20px;">👤 Dados do Cliente</h4>"#)?;
        writeln!(f, r#"<p style="{INFO_ROW}"><strong>Nome:</strong> <span>{}</span></p>"#, Escaped(&form.client_name))?;
        writeln!(f, r#"<p style="{INFO_ROW}"><strong>Telefone:</strong> <span>{}</span></p>"#, Escaped(&form.client_phone))?;
        writeln!(f, r#"<p style="{INFO_ROW}"><strong>E-mail:</strong> <span>{}</span></p>"#, Escaped(&form.client_email))?;
        if !form.client_company.trim().is_empty() {
            writeln!(f, r#"<p style="{INFO_ROW}"><strong>Empresa:</strong> <span>{}</span></p>"#, Escaped(&form.client_company))?;
        }
        writeln!(f, "</div>")?;

        writeln!(f, "</div>")
    }

    fn greeting(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let style = tone_style(self.form.budget_tone);
        writeln!(
            f,
            r#"<div style="margin-bottom: 40px; background: white; padding: 30px; border-radius: 20px; border-top: 5px solid #667eea;">"#
        )?;
        writeln!(
            f,
            r#"<p style="font-size: 20px; margin-bottom: 20px;"><strong>{} {},</strong></p>"#,
            style.greeting,
            Escaped(&self.form.client_name)
        )?;
        writeln!(f, r#"<p style="font-size: 17px; line-height: 1.8; color: #555;">{}</p>"#, style.intro)?;
        writeln!(f, "</div>")
    }

    fn project(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, r#"<div style="{CARD}">"#)?;
        writeln!(
            f,
            r#"<h3 style="color: #495057; margin-top: 0; border-bottom: 4px solid #667eea; padding-bottom: 20px; font-size: 26px;">🎯 DESCRIÇÃO DO PROJETO</h3>"#
        )?;
        writeln!(f, r#"<p style="margin: 20px 0; font-size: 16px;"><strong>Tipo de Serviço:</strong></p>"#)?;
        writeln!(
            f,
            r#"<p style="font-size: 20px; color: #667eea; font-weight: 600; margin: 0 0 20px 0;">{}</p>"#,
            Escaped(self.form.service_type.label())
        )?;
        writeln!(f, r#"<p style="margin: 20px 0 0 0; font-size: 16px;"><strong>Descrição Detalhada:</strong></p>"#)?;
        writeln!(
            f,
            r#"<div style="background: #fff; padding: 25px; border-radius: 15px; border: 2px solid #f1f3f4; font-size: 17px; line-height: 1.8;">{}</div>"#,
            Escaped(&self.form.project_description)
        )?;
        writeln!(f, "</div>")
    }

    fn items(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        if self.form.items.is_empty() {
            return Ok(());
        }
        writeln!(f, r#"<div style="{CARD}">"#)?;
        writeln!(
            f,
            r#"<h3 style="color: #495057; margin-top: 0; border-bottom: 3px solid #667eea; padding-bottom: 15px; font-size: 22px;">📋 ITENS DETALHADOS</h3>"#
        )?;
        writeln!(f, r#"<table style="width: 100%; border-collapse: collapse; margin-top: 20px;">"#)?;
        writeln!(f, r#"<thead><tr style="background: #e9ecef;">"#)?;
        writeln!(f, r#"<th style="{CELL} text-align: left;">Descrição</th>"#)?;
        writeln!(f, r#"<th style="{CELL} text-align: center; width: 80px;">Qtd</th>"#)?;
        writeln!(f, r#"<th style="{CELL} text-align: right; width: 120px;">Valor Unit.</th>"#)?;
        writeln!(f, r#"<th style="{CELL} text-align: right; width: 120px;">Total</th>"#)?;
        writeln!(f, "</tr></thead>")?;
        writeln!(f, "<tbody>")?;
        for (index, item) in self.form.items.iter().enumerate() {
            self.item_row(f, index, item)?;
        }
        writeln!(
            f,
            r#"<tr style="background: #28a745; color: white;"><td colspan="3" style="padding: 15px; font-weight: bold;">TOTAL GERAL</td><td style="padding: 15px; text-align: right; font-weight: bold; font-size: 18px;">{}</td></tr>"#,
            Brl(self.pricing.items_total)
        )?;
        writeln!(f, "</tbody>")?;
        writeln!(f, "</table>")?;
        writeln!(f, "</div>")
    }

    fn item_row(
        &self,
        f: &mut fmt::Formatter<'_>,
        index: usize,
        item: &LineItem,
    ) -> fmt::Result {
        let shade = if index % 2 == 0 { "#fff" } else { "#f8f9fa" };
        writeln!(f, r#"<tr style="background: {shade};">"#)?;
        writeln!(f, r#"<td style="{CELL}">{}</td>"#, Escaped(&item.description))?;
        writeln!(f, r#"<td style="{CELL} text-align: center;">{}</td>"#, item.quantity)?;
        writeln!(f, r#"<td style="{CELL} text-align: right;">{}</td>"#, Brl(item.unit_value))?;
        writeln!(
            f,
            r#"<td style="{CELL} text-align: right; font-weight: bold; color: #28a745;">{}</td>"#,
            Brl(item.total())
        )?;
        writeln!(f, "</tr>")
    }

    fn investment(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let pricing = self.pricing;
        writeln!(f, r#"<div style="{CARD}">"#)?;
        writeln!(
            f,
            r#"<h3 style="color: #495057; margin-top: 0; border-bottom: 4px solid #28a745; padding-bottom: 20px; font-size: 26px;">💰 INVESTIMENTO</h3>"#
        )?;

        if pricing.has_discount() {
            writeln!(
                f,
                r#"<div style="background: #fff3cd; border: 2px solid #ffeaa7; border-radius: 15px; padding: 25px; margin-bottom: 25px;">"#
            )?;
            writeln!(f, r#"<h4 style="color: #856404; margin-top: 0; font-size: 18px;">🎉 DESCONTO ESPECIAL</h4>"#)?;
            writeln!(
                f,
                r#"<div style="display: flex; justify-content: space-between;"><span>Valor Original:</span><span style="text-decoration: line-through; color: #6c757d;">{}</span></div>"#,
                Brl(pricing.total_value)
            )?;
            writeln!(
                f,
                r#"<div style="display: flex; justify-content: space-between; color: #856404;"><span>Desconto ({}%):</span><span style="font-weight: bold;">- {}</span></div>"#,
                format_percent(pricing.discount_percent),
                Brl(pricing.discount_value)
            )?;
            writeln!(f, "</div>")?;
        }

        writeln!(
            f,
            r#"<div style="display: flex; justify-content: space-between; align-items: center; background: linear-gradient(135deg, #28a745 0%, #20c997 100%); color: white; padding: 30px; border-radius: 20px; margin: 25px 0;"><span style="font-size: 24px; font-weight: 600;">💎 Valor Total do Projeto:</span><span style="font-size: 32px; font-weight: bold;">{}</span></div>"#,
            Brl(pricing.final_value)
        )?;

        writeln!(f, r#"<div style="display: grid; grid-template-columns: 1fr 1fr; gap: 25px; margin-top: 30px;">"#)?;
        writeln!(
            f,
            r#"<div style="padding: 25px; border-radius: 15px; border-left: 5px solid #667eea;"><p style="margin: 0 0 15px 0; font-weight: bold; color: #667eea;">⏱️ Prazo de Execução:</p><p style="margin: 0; font-size: 20px; font-weight: 600;">{} dias úteis</p></div>"#,
            self.form.project_deadline
        )?;
        writeln!(
            f,
            r#"<div style="padding: 25px; border-radius: 15px; border-left: 5px solid #28a745;"><p style="margin: 0 0 15px 0; font-weight: bold; color: #28a745;">💳 Forma de Pagamento:</p><p style="margin: 0; font-size: 17px;">{}</p></div>"#,
            self.form.payment_method.label()
        )?;
        writeln!(f, "</div>")?;
        writeln!(f, "</div>")
    }

    fn inclusions(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(f, r#"<div style="{CARD}">"#)?;
        writeln!(
            f,
            r#"<h3 style="color: #495057; margin-top: 0; border-bottom: 4px solid #17a2b8; padding-bottom: 20px; font-size: 26px;">📋 O QUE ESTÁ INCLUSO</h3>"#
        )?;
        writeln!(f, r#"<div style="display: grid; grid-template-columns: 1fr 1fr; gap: 20px; margin-top: 25px;">"#)?;
        for entry in inclusions(self.form.support_days) {
            writeln!(
                f,
                r#"<div style="display: flex; align-items: center; padding: 18px; background: #f8f9fa; border-radius: 12px; border-left: 5px solid #28a745;"><span style="margin-right: 15px; font-size: 24px;">{CHECK_MARK}</span><span style="font-weight: 500;">{entry}</span></div>"#
            )?;
        }
        writeln!(f, "</div>")?;
        writeln!(f, "</div>")
    }

    fn observations(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            r#"<div style="background: #fff3cd; border: 2px solid #ffeaa7; border-radius: 20px; padding: 30px; margin-bottom: 40px;">"#
        )?;
        writeln!(f, r#"<h4 style="color: #856404; margin-top: 0; font-size: 22px;">⚠️ OBSERVAÇÕES IMPORTANTES</h4>"#)?;
        writeln!(f, r#"<ul style="color: #856404; margin: 20px 0 0 0; padding-left: 25px; line-height: 2; font-size: 16px;">"#)?;
        for entry in observations(self.form.delivery_type, self.form.support_days) {
            writeln!(f, "<li>{entry}</li>")?;
        }
        writeln!(f, "</ul>")?;
        writeln!(f, "</div>")
    }

    fn closing(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let form = self.form;
        let style = tone_style(form.budget_tone);
        writeln!(
            f,
            r#"<div style="text-align: center; margin: 50px 0; background: white; padding: 40px; border-radius: 20px;">"#
        )?;
        writeln!(f, r#"<p style="font-size: 20px; margin-bottom: 30px; line-height: 1.8;">{}</p>"#, style.closing)?;
        writeln!(
            f,
            r#"<div style="background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 35px; border-radius: 20px;">"#
        )?;
        writeln!(f, r#"<p style="margin: 0 0 20px 0; font-weight: bold; font-size: 24px;">📞 Entre em contato conosco:</p>"#)?;
        writeln!(f, r#"<p style="margin: 8px 0;">📱 {}</p>"#, Escaped(&form.company_phone))?;
        writeln!(f, r#"<p style="margin: 8px 0;">📧 {}</p>"#, Escaped(&form.company_email))?;
        if !form.company_address.trim().is_empty() {
            writeln!(f, r#"<p style="margin: 8px 0;">📍 {}</p>"#, Escaped(&form.company_address))?;
        }
        writeln!(f, "</div>")?;
        writeln!(f, "</div>")
    }

    fn footer(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            r#"<footer style="text-align: center; padding: 30px; border-top: 4px solid #e9ecef; margin-top: 50px; color: #6c757d; border-radius: 20px;">"#
        )?;
        writeln!(
            f,
            r#"<p style="margin: 0 0 15px 0; font-size: 16px;">🤖 <strong>Orçamento gerado automaticamente com IA em {}</strong></p>"#,
            self.ctx.today()
        )?;
        writeln!(
            f,
            r#"<p style="margin: 0; font-size: 14px; opacity: 0.8;">© {} {} - Todos os direitos reservados</p>"#,
            self.ctx.now.year(),
            Escaped(&self.form.company_name)
        )?;
        writeln!(
            f,
            r#"<p style="margin: 10px 0 0 0; font-size: 12px; opacity: 0.6;">Powered by {PRODUCT_NAME} {VERSION}</p>"#
        )?;
        writeln!(f, "</footer>")
    }
}

impl fmt::Display for Proposal<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        writeln!(
            f,
            r#"<div style="max-width: 900px; margin: 0 auto; font-family: 'Inter', sans-serif; line-height: 1.6; color: #333;">"#
        )?;
        self.header(f)?;
        self.info_block(f)?;
        self.greeting(f)?;
        self.project(f)?;
        self.items(f)?;
        self.investment(f)?;
        self.inclusions(f)?;
        self.observations(f)?;
        self.closing(f)?;
        self.footer(f)?;
        writeln!(f, "</div>")
    }
}
