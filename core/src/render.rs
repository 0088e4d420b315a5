//! HTML rendering for the TV panel.
//!
//! RULE: rendering is pure string assembly over already-aggregated data.
//! No queries, no clock reads; the caller supplies the formatted stamp.

use crate::aggregate::{ComunaAggregate, GlobalSummary, StratumBreakdown, StratumSummary, TrustRow};
use crate::enrich::StratumGroup;
use crate::format::{format_count, format_currency, format_currency_full, format_pct};
use crate::status::UtilizationStatus;

/// Stylesheet embedded in every rendered panel.
pub const PANEL_CSS: &str = include_str!("panel.css");

/// Legend entries: banner text, range description, accent color, background.
const LEGEND: [(&str, &str, &str, &str); 4] = [
    ("POTENCIALMENTE AGOTADO", ">= 90% usado", "#d93025", "#fce8e6"),
    ("MODERADO", "70-89% usado", "#f9ab00", "#fef7e0"),
    ("DISPONIBLE", "40-70% usado", "#34a853", "#e6f4ea"),
    ("MUY DISPONIBLE", "< 40% usado", "#0b8043", "#d5e8d9"),
];

/// Escape text for HTML element or attribute content.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render the full panel fragment: stats strip, users card, one section per
/// comuna, legend and footer. Self-contained (carries its own `<style>`); the
/// caller decides whether to wrap it in a document shell.
pub fn render_panel(
    comunas: &[ComunaAggregate],
    summary: &GlobalSummary,
    breakdown: &StratumBreakdown,
    stamp: &str,
) -> String {
    let mut html = String::new();
    html.push_str("<div class=\"fiducias-container\">\n");
    html.push_str(&format!("<style>\n{PANEL_CSS}</style>\n"));
    html.push_str(&stats_strip(summary));
    html.push_str(&users_card(summary, breakdown));
    html.push_str("<div class=\"comunas-sections\">\n");
    for comuna in comunas {
        html.push_str(&comuna_section(comuna));
    }
    html.push_str("</div>\n");
    html.push_str(&legend_strip());
    html.push_str(&panel_footer(stamp));
    html.push_str("</div>\n");
    html
}

fn stats_strip(summary: &GlobalSummary) -> String {
    let mut html = String::from("<div class=\"stats-strip\">\n");
    html.push_str(&stat_box(
        "FIDUCIAS TOTALES",
        &summary.trust_count.to_string(),
        Some(&format!(
            "1-3: {} | 4-6: {}",
            summary.low_trust_count, summary.high_trust_count
        )),
    ));
    html.push_str(&stat_box(
        "PRESUPUESTO TOTAL",
        &format_currency_full(summary.total_budget),
        None,
    ));
    html.push_str(&stat_box("LEGALIZADOS", &format_count(summary.total_users), None));
    html.push_str("</div>\n");
    html
}

fn stat_box(label: &str, value: &str, delta: Option<&str>) -> String {
    let mut html = format!(
        "<div class=\"stat-box\">\
         <div class=\"stat-label\">{label}</div>\
         <div class=\"stat-value\">{value}</div>"
    );
    if let Some(delta) = delta {
        html.push_str(&format!("<div class=\"stat-delta\">{delta}</div>"));
    }
    html.push_str("</div>\n");
    html
}

fn users_card(summary: &GlobalSummary, breakdown: &StratumBreakdown) -> String {
    let low_pct = breakdown.low_share_pct();
    let high_pct = breakdown.high_share_pct();
    format!(
        r#"<div class="single-metric-container">
<div class="single-metric-card">
<div class="single-metric-header">
<div class="single-metric-title">&#128101; USUARIOS LEGALIZADOS</div>
<div class="single-metric-total">{total}</div>
</div>
<div class="single-metric-details">
<div class="detail-column">
<div class="detail-label">Estratos 1-3</div>
<div class="detail-value estrato-123">{low}</div>
<div class="detail-percent">{low_pct}</div>
</div>
<div class="detail-separator"></div>
<div class="detail-column">
<div class="detail-label">Estratos 4-6</div>
<div class="detail-value estrato-456">{high}</div>
<div class="detail-percent">{high_pct}</div>
</div>
</div>
<div class="single-metric-bar">
<div class="bar-fill estrato-123-bar" style="width: {low_w:.1}%"><span class="bar-label">1-3</span></div>
<div class="bar-fill estrato-456-bar" style="width: {high_w:.1}%"><span class="bar-label">4-6</span></div>
</div>
<div class="single-metric-footer">
<div class="footer-info">
<span>&#128203; Presupuesto Total: {budget}</span>
<span>&#128176; Disponible: {remaining}</span>
<span>&#127960;&#65039; Comunas Activas: {comunas}</span>
</div>
</div>
</div>
</div>
"#,
        total = format_count(breakdown.total()),
        low = format_count(breakdown.low_users),
        high = format_count(breakdown.high_users),
        low_pct = format_pct(low_pct),
        high_pct = format_pct(high_pct),
        low_w = low_pct,
        high_w = high_pct,
        budget = format_currency(Some(summary.total_budget as f64)),
        remaining = format_currency(Some(summary.total_remaining as f64)),
        comunas = summary.comuna_count,
    )
}

fn comuna_section(comuna: &ComunaAggregate) -> String {
    let mut html = format!(
        "<div class=\"comuna-section\">\n\
         <div class=\"comuna-section-header\">\
         <div class=\"comuna-section-numero\">{}</div>\
         <div class=\"comuna-section-nombre\">{}</div>\
         </div>\n",
        escape_html(&comuna.district_number),
        escape_html(&comuna.base_name),
    );
    html.push_str(&estrato_row(
        StratumGroup::Low,
        comuna.low_summary.as_ref(),
        &comuna.low_trusts,
    ));
    html.push_str(&estrato_row(
        StratumGroup::High,
        comuna.high_summary.as_ref(),
        &comuna.high_trusts,
    ));
    html.push_str("</div>\n");
    html
}

fn estrato_row(
    group: StratumGroup,
    summary: Option<&StratumSummary>,
    trusts: &[TrustRow],
) -> String {
    // A stratum counts as present only when both the rollup and at least
    // one trust row exist.
    let has_data = summary.is_some() && !trusts.is_empty();
    format!(
        "<div class=\"estrato-row\">\n{}{}</div>\n",
        resumen_card(group, summary, has_data),
        fiducias_card(group, trusts, has_data),
    )
}

fn resumen_card(group: StratumGroup, summary: Option<&StratumSummary>, has_data: bool) -> String {
    let title = stratum_title(group);
    let badge = badge_class(group);
    let summary = match (has_data, summary) {
        (true, Some(summary)) => summary,
        _ => {
            return format!(
                "<div class=\"estrato-resumen-card no-data\">\
                 <div class=\"estrato-resumen-header\">\
                 <div class=\"estrato-resumen-title\">{title}</div>\
                 <div class=\"estrato-resumen-badge {badge}\">RESUMEN</div>\
                 </div>\
                 {}\
                 </div>\n",
                no_data_state(group),
            );
        }
    };

    let pct = summary.utilization_pct();
    let status = UtilizationStatus::from_pct(pct);
    let color = status.color();
    format!(
        "<div class=\"estrato-resumen-card {css}\">\
         <div class=\"estrato-resumen-header\">\
         <div class=\"estrato-resumen-title\">{title}</div>\
         <div class=\"estrato-resumen-badge {badge}\">RESUMEN</div>\
         </div>\
         <div class=\"estrato-resumen-status {css}\">\
         <span class=\"estrato-resumen-status-text\">{label}</span>\
         </div>\
         <div class=\"estrato-resumen-metrics\">\
         <div class=\"estrato-metric-row\">\
         <span class=\"estrato-metric-label\">Presupuesto Total</span>\
         <span class=\"estrato-metric-value\">{budget}</span>\
         </div>\
         <div class=\"estrato-metric-row\">\
         <span class=\"estrato-metric-label\" style=\"color: #1a73e8;\">Restante</span>\
         <span class=\"estrato-metric-value\" style=\"color: #1a73e8;\">{remaining}</span>\
         </div>\
         <div class=\"estrato-metric-row\">\
         <span class=\"estrato-metric-label\" style=\"color: #34a853;\">Legalizados</span>\
         <span class=\"estrato-metric-value\" style=\"color: #34a853;\">{users}</span>\
         </div>\
         </div>\
         <div class=\"estrato-resumen-progress\">\
         <div class=\"estrato-resumen-progress-info\">\
         <span class=\"estrato-resumen-progress-label\">Utilizaci&oacute;n</span>\
         <span class=\"estrato-resumen-progress-value\" style=\"color: {color};\">{pct}</span>\
         </div>\
         <div class=\"estrato-resumen-progress-bar\">\
         <div class=\"estrato-resumen-progress-fill\" style=\"width: {width:.1}%; background: {color};\"></div>\
         </div>\
         </div>\
         </div>\n",
        css = status.css_class(),
        label = status.label(),
        budget = format_currency_full(summary.budget_total),
        remaining = format_currency_full(summary.budget_remaining),
        users = format_count(summary.user_count),
        pct = format_pct(pct),
        width = pct,
    )
}

fn fiducias_card(group: StratumGroup, trusts: &[TrustRow], has_data: bool) -> String {
    let title = stratum_title(group);
    if !has_data {
        return format!(
            "<div class=\"fiducias-card no-data\">\
             <div class=\"fiducias-header no-data\">\
             <div class=\"fiducias-title\">FIDUCIAS {title}</div>\
             </div>\
             {}\
             </div>\n",
            no_data_state(group),
        );
    }

    let mut html = format!(
        "<div class=\"fiducias-card\">\
         <div class=\"fiducias-header\">\
         <div class=\"fiducias-title\">&#128230; FIDUCIAS {title}</div>\
         <div class=\"fiducias-count\">{} fiducia(s)</div>\
         </div>\
         <div class=\"fiducias-list\">\n",
        trusts.len(),
    );
    for trust in trusts {
        html.push_str(&trust_item(trust));
    }
    html.push_str("</div></div>\n");
    html
}

fn trust_item(trust: &TrustRow) -> String {
    let pct = trust.utilization_pct();
    let color = UtilizationStatus::from_pct(pct).color();
    format!(
        "<div class=\"fiducia-item\">\
         <div class=\"fiducia-header\">\
         <div class=\"fiducia-id\">Fiducia {id}</div>\
         <div class=\"fiducia-porcentaje\" style=\"color: {color};\">{pct}</div>\
         </div>\
         <div class=\"fiducias-metrics\">\
         <div class=\"fiducia-metric\">\
         <div class=\"fiducia-metric-label\">Presupuesto</div>\
         <div class=\"fiducia-metric-value\">{budget}</div>\
         </div>\
         <div class=\"fiducia-metric\">\
         <div class=\"fiducia-metric-label\">Restante</div>\
         <div class=\"fiducia-metric-value available\">{remaining}</div>\
         </div>\
         </div>\
         <div class=\"fiducia-progress-bar\">\
         <div class=\"fiducia-progress-fill\" style=\"width: {width:.1}%; background: {color};\"></div>\
         </div>\
         </div>\n",
        id = escape_html(&trust.trust_id),
        pct = format_pct(pct),
        budget = format_currency_full(trust.budget_total),
        remaining = format_currency_full(trust.budget_remaining),
        width = pct,
    )
}

fn no_data_state(group: StratumGroup) -> String {
    format!(
        "<div class=\"no-data-state\">\
         <div class=\"no-data-icon\">&#128237;</div>\
         <div class=\"no-data-title\">NO APLICA</div>\
         <div class=\"no-data-text\">Esta comuna no tiene {}</div>\
         </div>",
        group.range_label(),
    )
}

fn legend_strip() -> String {
    let mut html = String::from("<div class=\"legend-strip\">\n");
    for (name, desc, color, bg) in LEGEND {
        html.push_str(&format!(
            "<div class=\"legend-box\" style=\"background: {bg}; border: 3px solid {color};\">\
             <div class=\"legend-name\" style=\"color: {color};\">{name}</div>\
             <div class=\"legend-desc\">{desc}</div>\
             </div>\n"
        ));
    }
    html.push_str("</div>\n");
    html
}

fn panel_footer(stamp: &str) -> String {
    format!(
        "<div class=\"panel-footer\">\
         <div class=\"panel-footer-label\">&Uacute;ltima actualizaci&oacute;n</div>\
         <div class=\"panel-footer-stamp\">{}</div>\
         <div class=\"panel-footer-org\">Sapiencia - Agencia de Educaci&oacute;n Postsecundaria de Medell&iacute;n &bull; Dashboard v1.0</div>\
         </div>\n",
        escape_html(stamp),
    )
}

fn stratum_title(group: StratumGroup) -> String {
    format!("ESTRATOS {}", group.range_label())
}

fn badge_class(group: StratumGroup) -> &'static str {
    match group {
        StratumGroup::Low => "estrato-123",
        StratumGroup::High => "estrato-456",
    }
}
