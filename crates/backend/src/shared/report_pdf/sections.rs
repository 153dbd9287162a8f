//! Report sections built from aggregator output.
//!
//! Each builder takes `Option<&Report>`; `None` means the figures never
//! arrived and the section becomes an explicit "no data" placeholder.

use contracts::dashboards::d400_summary_report::SummaryReport;
use contracts::dashboards::d401_orders_report::OrdersReport;
use contracts::dashboards::d402_clients_report::ClientsReport;
use contracts::dashboards::d403_attendance_report::AttendanceReport;
use contracts::shared::report_document::{
    InsightBlock, KeyValueBlock, Section, SectionBlock, TableBlock, TableColumn,
};

use crate::shared::error::ReportSection;
use crate::shared::format::{format_currency, format_number, format_percent};

const MISSING: &str = "no se recibieron datos para esta sección";

/// The four report sections in their fixed order
pub fn build_sections(
    summary: Option<&SummaryReport>,
    orders: Option<&OrdersReport>,
    clients: Option<&ClientsReport>,
    attendance: Option<&AttendanceReport>,
) -> Vec<Section> {
    vec![
        summary_section(summary),
        orders_section(orders),
        clients_section(clients),
        attendance_section(attendance),
    ]
}

fn placeholder(section: ReportSection) -> Section {
    Section::no_data(section.title(), MISSING)
}

/// Table block, or a one-line note when there are no rows
fn table_or_note(caption: &str, columns: Vec<TableColumn>, rows: Vec<Vec<String>>) -> SectionBlock {
    if rows.is_empty() {
        return SectionBlock::Insight(InsightBlock {
            text: format!("{}: sin registros en el periodo", caption),
        });
    }
    SectionBlock::Table(TableBlock {
        caption: Some(caption.to_string()),
        columns,
        rows,
    })
}

pub fn summary_section(report: Option<&SummaryReport>) -> Section {
    let Some(r) = report else {
        return placeholder(ReportSection::Summary);
    };

    let mut kv = KeyValueBlock::default();
    kv.push("Ingresos totales", format_currency(r.total_revenue));
    kv.push("Pedidos", format_number(r.total_orders as u64));
    kv.push("Clientes activos", format_number(r.active_clients as u64));
    kv.push("Pagos pendientes", format_currency(r.pending_payments));
    kv.push("Asistencia promedio", format_percent(r.average_attendance));
    kv.push("Tasa de cobranza", format_percent(r.collection_rate));
    kv.push(
        "Cliente principal",
        match &r.top_client {
            Some(top) => format!("{} ({})", top.name, format_percent(top.percentage)),
            None => "Sin ventas liquidadas".to_string(),
        },
    );

    let mut section = Section::new(ReportSection::Summary.title()).with_block(SectionBlock::KeyValue(kv));
    if r.pending_payments > 0.0 {
        section = section.with_block(SectionBlock::Insight(InsightBlock {
            text: format!(
                "Quedan {} por cobrar en pedidos del periodo.",
                format_currency(r.pending_payments)
            ),
        }));
    }
    section
}

pub fn orders_section(report: Option<&OrdersReport>) -> Section {
    let Some(r) = report else {
        return placeholder(ReportSection::Orders);
    };

    let over_time = r
        .orders_over_time
        .iter()
        .zip(&r.average_order_value)
        .map(|(b, avg)| {
            vec![
                b.period.clone(),
                format_number(b.count as u64),
                format_currency(b.total),
                format_currency(avg.average),
            ]
        })
        .collect();
    let by_status = r
        .status_distribution
        .iter()
        .map(|s| vec![s.name.clone(), format_number(s.count as u64), format_currency(s.total)])
        .collect();
    let top_clients = r
        .top_clients_by_orders
        .iter()
        .map(|c| vec![c.name.clone(), format_number(c.orders as u64), format_currency(c.total)])
        .collect();

    Section::new(ReportSection::Orders.title())
        .with_block(table_or_note(
            "Pedidos por periodo",
            vec![
                TableColumn::left("Periodo", 175.0),
                TableColumn::right("Pedidos", 80.0),
                TableColumn::right("Total", 130.0),
                TableColumn::right("Ticket promedio", 130.0),
            ],
            over_time,
        ))
        .with_block(table_or_note(
            "Estado de pago",
            vec![
                TableColumn::left("Estado", 255.0),
                TableColumn::right("Pedidos", 100.0),
                TableColumn::right("Total", 160.0),
            ],
            by_status,
        ))
        .with_block(table_or_note(
            "Clientes con más pedidos",
            vec![
                TableColumn::left("Cliente", 255.0),
                TableColumn::right("Pedidos", 100.0),
                TableColumn::right("Total", 160.0),
            ],
            top_clients,
        ))
}

pub fn clients_section(report: Option<&ClientsReport>) -> Section {
    let Some(r) = report else {
        return placeholder(ReportSection::Clients);
    };

    let mut kv = KeyValueBlock::default();
    kv.push("Clientes activos", format_number(r.active_clients as u64));
    kv.push("Clientes con crédito", format_number(r.credit.clients_with_credit as u64));
    kv.push("Crédito pendiente", format_currency(r.credit.total_credit_amount));

    let activity = r
        .client_activity
        .iter()
        .map(|b| vec![b.period.clone(), format_number(b.active_clients as u64)])
        .collect();
    let top = r
        .top_clients_by_revenue
        .iter()
        .enumerate()
        .map(|(i, c)| {
            vec![
                (i + 1).to_string(),
                c.name.clone(),
                format_currency(c.revenue),
                format_number(c.orders as u64),
                format_percent(format!("{:.1}", c.percentage)),
            ]
        })
        .collect();
    let routes = r
        .clients_by_route
        .iter()
        .map(|route| vec![route.route.clone(), format_number(route.clients as u64)])
        .collect();
    let debtors = r
        .top_debtors
        .iter()
        .map(|d| {
            vec![
                d.name.clone(),
                format_currency(d.total_debt),
                format_number(d.debt_orders as u64),
                d.days_outstanding.to_string(),
            ]
        })
        .collect();
    let retention = r
        .retention
        .iter()
        .map(|s| vec![s.segment.clone(), format_number(s.count as u64)])
        .collect();

    Section::new(ReportSection::Clients.title())
        .with_block(SectionBlock::KeyValue(kv))
        .with_block(table_or_note(
            "Actividad de clientes",
            vec![TableColumn::left("Periodo", 315.0), TableColumn::right("Clientes activos", 200.0)],
            activity,
        ))
        .with_block(table_or_note(
            "Principales clientes por ingresos",
            vec![
                TableColumn::right("#", 30.0),
                TableColumn::left("Cliente", 205.0),
                TableColumn::right("Ingresos", 120.0),
                TableColumn::right("Pedidos", 70.0),
                TableColumn::right("Participación", 90.0),
            ],
            top,
        ))
        .with_block(table_or_note(
            "Clientes por ruta",
            vec![TableColumn::left("Ruta", 315.0), TableColumn::right("Clientes", 200.0)],
            routes,
        ))
        .with_block(table_or_note(
            "Principales deudores",
            vec![
                TableColumn::left("Cliente", 215.0),
                TableColumn::right("Deuda", 120.0),
                TableColumn::right("Pedidos", 80.0),
                TableColumn::right("Días", 100.0),
            ],
            debtors,
        ))
        .with_block(table_or_note(
            "Retención",
            vec![TableColumn::left("Segmento", 315.0), TableColumn::right("Clientes", 200.0)],
            retention,
        ))
}

pub fn attendance_section(report: Option<&AttendanceReport>) -> Section {
    let Some(r) = report else {
        return placeholder(ReportSection::Attendance);
    };
    let o = &r.overview;

    let mut kv = KeyValueBlock::default();
    kv.push("Tasa de asistencia", format_percent(o.attendance_rate));
    kv.push("Asistencias esperadas", format_number(o.expected_attendance as u64));
    kv.push("Asistencias registradas", format_number(o.actual_attendance as u64));
    kv.push("Faltas", format_number(o.total_absences as u64));
    kv.push("Retardos", format_number(o.late_arrivals as u64));
    kv.push("Minutos de retardo promedio", o.average_late_minutes.to_string());
    kv.push("Horas trabajadas", format_number(o.total_hours_worked as u64));
    kv.push("Horas promedio por día", o.average_hours_per_day.to_string());
    kv.push("Entrada promedio", o.average_check_in.clone().unwrap_or_else(|| "-".into()));
    kv.push("Salida promedio", o.average_check_out.clone().unwrap_or_else(|| "-".into()));

    let employees = r
        .by_employee
        .iter()
        .map(|e| {
            vec![
                e.name.clone(),
                e.position.clone(),
                format!("{} / {}", e.days_worked, e.total_days),
                format_percent(e.attendance_rate),
            ]
        })
        .collect();
    let weekdays = r
        .by_day_of_week
        .iter()
        .map(|d| vec![d.day.clone(), format_percent(d.attendance_rate)])
        .collect();
    let punctuality = r
        .punctuality
        .iter()
        .map(|p| vec![p.name.clone(), format_number(p.count as u64)])
        .collect();
    let daily = r
        .daily
        .iter()
        .map(|d| {
            vec![
                d.date.format("%d/%m/%Y").to_string(),
                format_percent(d.attendance_rate),
                format_percent(d.average_attendance),
            ]
        })
        .collect();

    Section::new(ReportSection::Attendance.title())
        .with_block(SectionBlock::KeyValue(kv))
        .with_block(table_or_note(
            "Asistencia por empleado",
            vec![
                TableColumn::left("Empleado", 195.0),
                TableColumn::left("Puesto", 140.0),
                TableColumn::right("Días", 90.0),
                TableColumn::right("Tasa", 90.0),
            ],
            employees,
        ))
        .with_block(table_or_note(
            "Asistencia por día de la semana",
            vec![TableColumn::left("Día", 315.0), TableColumn::right("Tasa", 200.0)],
            weekdays,
        ))
        .with_block(table_or_note(
            "Puntualidad",
            vec![TableColumn::left("Categoría", 315.0), TableColumn::right("Registros", 200.0)],
            punctuality,
        ))
        .with_block(table_or_note(
            "Asistencia diaria",
            vec![
                TableColumn::left("Fecha", 175.0),
                TableColumn::right("Asistencia", 170.0),
                TableColumn::right("Promedio del periodo", 170.0),
            ],
            daily,
        ))
}
