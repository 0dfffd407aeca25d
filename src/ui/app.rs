use std::mem;

use anyhow::Result;
use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;
use rusqlite::Connection;

use crate::db::{
    count_appointments, count_doctors, count_patients, create_doctor, create_patient,
    fetch_appointments, fetch_doctors, fetch_patients, fetch_raw_appointments,
    schedule_appointment,
};
use crate::models::{Appointment, Doctor, Patient, Totals};

use super::forms::{AppointmentForm, DoctorForm, PatientForm};
use super::helpers::{centered_rect, labeled_line, surface_error, visible_range};
use super::screens::{AppointmentsScreen, ReportsScreen, RosterScreen};

/// Height of the navigation bar across the top.
const TAB_BAR_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Height allocation per patient card, borders included.
const PATIENT_CARD_HEIGHT: u16 = 6;
/// Height allocation per doctor card.
const DOCTOR_CARD_HEIGHT: u16 = 5;
/// Height allocation per appointment card, shared by both listing modes.
const APPOINTMENT_CARD_HEIGHT: u16 = 5;

/// Titles shown in the navigation bar, in keyboard order (`1` through `4`).
const TAB_TITLES: &[&str] = &["Patients", "Doctors", "Appointments", "Reports"];

/// High-level navigation states, one per top-level screen. Each variant owns
/// the data its renderer needs.
enum Screen {
    Patients(RosterScreen<Patient>),
    Doctors(RosterScreen<Doctor>),
    Appointments(AppointmentsScreen),
    Reports(ReportsScreen),
}

impl Screen {
    fn tab_index(&self) -> usize {
        match self {
            Screen::Patients(_) => 0,
            Screen::Doctors(_) => 1,
            Screen::Appointments(_) => 2,
            Screen::Reports(_) => 3,
        }
    }
}

/// Fine-grained interaction modes. `Normal` navigates; the others are modal
/// entry forms layered over the active screen.
enum Mode {
    Normal,
    AddingPatient(PatientForm),
    AddingDoctor(DoctorForm),
    SchedulingAppointment(AppointmentForm),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state. The struct owns the SQLite connection for the
/// life of the session and hands out `&Connection` per operation; there is no
/// shared global handle anywhere.
pub struct App {
    conn: Connection,
    screen: Screen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    /// Construct the app on the Patients screen with a preloaded roster.
    pub fn new(conn: Connection, patients: Vec<Patient>) -> Self {
        Self {
            conn,
            screen: Screen::Patients(RosterScreen::new(patients)),
            mode: Mode::Normal,
            status: None,
        }
    }

    /// Top-level key dispatcher. Every key funnels through the active `Mode`,
    /// which returns the next mode to run. The boolean result tells the outer
    /// loop whether the user requested an exit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::AddingPatient(form) => self.handle_add_patient(code, form)?,
            Mode::AddingDoctor(form) => self.handle_add_doctor(code, form)?,
            Mode::SchedulingAppointment(form) => self.handle_schedule(code, form)?,
        };

        self.mode = mode;
        Ok(exit)
    }

    /// Handle keys while no modal is open: screen switching, list movement,
    /// and opening the entry form that matches the active screen.
    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                *exit = true;
                return Ok(Mode::Normal);
            }
            KeyCode::Char('1') | KeyCode::Char('p') | KeyCode::Char('P') => {
                self.clear_status();
                self.open_patients()?;
                return Ok(Mode::Normal);
            }
            KeyCode::Char('2') | KeyCode::Char('d') | KeyCode::Char('D') => {
                self.clear_status();
                self.open_doctors()?;
                return Ok(Mode::Normal);
            }
            KeyCode::Char('3') | KeyCode::Char('a') | KeyCode::Char('A') => {
                self.clear_status();
                self.open_appointments()?;
                return Ok(Mode::Normal);
            }
            KeyCode::Char('4') | KeyCode::Char('r') | KeyCode::Char('R') => {
                self.clear_status();
                self.open_reports()?;
                return Ok(Mode::Normal);
            }
            KeyCode::Char('+') => return self.open_entry_form(),
            _ => {}
        }

        match &mut self.screen {
            Screen::Patients(roster) => match code {
                KeyCode::Up => roster.move_selection(-1),
                KeyCode::Down => roster.move_selection(1),
                KeyCode::PageUp => roster.move_selection(-5),
                KeyCode::PageDown => roster.move_selection(5),
                KeyCode::Home => roster.select_first(),
                KeyCode::End => roster.select_last(),
                _ => {}
            },
            Screen::Doctors(roster) => match code {
                KeyCode::Up => roster.move_selection(-1),
                KeyCode::Down => roster.move_selection(1),
                KeyCode::PageUp => roster.move_selection(-5),
                KeyCode::PageDown => roster.move_selection(5),
                KeyCode::Home => roster.select_first(),
                KeyCode::End => roster.select_last(),
                _ => {}
            },
            Screen::Appointments(appointments) => match code {
                KeyCode::Up => appointments.move_selection(-1),
                KeyCode::Down => appointments.move_selection(1),
                KeyCode::PageUp => appointments.move_selection(-5),
                KeyCode::PageDown => appointments.move_selection(5),
                KeyCode::Home => appointments.select_first(),
                KeyCode::End => appointments.select_last(),
                KeyCode::Char('t') | KeyCode::Char('T') => {
                    let raw = appointments.toggle_raw();
                    let message = if raw {
                        "Showing raw appointment rows."
                    } else {
                        "Showing the joined appointment listing."
                    };
                    self.set_status(message, StatusKind::Info);
                }
                _ => {}
            },
            Screen::Reports(_) => {}
        }

        Ok(Mode::Normal)
    }

    /// Open the entry form matching the active screen. Scheduling reads a
    /// fresh roster first; with nothing to pick from, the form never opens.
    fn open_entry_form(&mut self) -> Result<Mode> {
        self.clear_status();
        match self.screen {
            Screen::Patients(_) => Ok(Mode::AddingPatient(PatientForm::default())),
            Screen::Doctors(_) => Ok(Mode::AddingDoctor(DoctorForm::new())),
            Screen::Appointments(_) => self.open_schedule_form(),
            Screen::Reports(_) => {
                self.set_status("Reports are read-only.", StatusKind::Error);
                Ok(Mode::Normal)
            }
        }
    }

    /// Build the scheduling form from fresh roster reads. The empty-roster
    /// guard is a UI affordance only; the insert contract itself never checks
    /// the references.
    fn open_schedule_form(&mut self) -> Result<Mode> {
        let patients = fetch_patients(&self.conn)?;
        if patients.is_empty() {
            self.set_status("No patients registered yet.", StatusKind::Error);
            return Ok(Mode::Normal);
        }
        let doctors = fetch_doctors(&self.conn)?;
        if doctors.is_empty() {
            self.set_status("No doctors registered yet.", StatusKind::Error);
            return Ok(Mode::Normal);
        }
        Ok(Mode::SchedulingAppointment(AppointmentForm::new(
            &patients, &doctors,
        )))
    }

    /// Process key presses while the "Add Patient" form is active.
    fn handle_add_patient(&mut self, code: KeyCode, mut form: PatientForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add patient cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.prev_field(),
            KeyCode::Left | KeyCode::Up => form.cycle_option(-1),
            KeyCode::Right | KeyCode::Down => form.cycle_option(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_patient(&form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingPatient(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    /// Mirror of `handle_add_patient` for the doctor form.
    fn handle_add_doctor(&mut self, code: KeyCode, mut form: DoctorForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Add doctor cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.prev_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_doctor(&form) {
                Ok(_) => keep_open = false,
                Err(err) => {
                    let message = surface_error(&err);
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::AddingDoctor(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    /// Scheduling form handler. Arrow keys cycle whichever picker has focus;
    /// the booking happens on Enter and reuses the picked labels for the
    /// status line.
    fn handle_schedule(&mut self, code: KeyCode, mut form: AppointmentForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                self.set_status("Scheduling cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab => form.next_field(),
            KeyCode::BackTab => form.prev_field(),
            KeyCode::Left | KeyCode::Up => form.cycle_option(-1),
            KeyCode::Right | KeyCode::Down => form.cycle_option(1),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match form.parse_inputs() {
                Ok((patient_id, doctor_id, date)) => {
                    match schedule_appointment(&self.conn, patient_id, doctor_id, &date) {
                        Ok(_) => {
                            self.refresh_appointments()?;
                            let doctor = form
                                .selected_doctor_label()
                                .unwrap_or("the doctor")
                                .to_string();
                            self.set_status(
                                format!("Appointment booked with {doctor} on {date}."),
                                StatusKind::Info,
                            );
                            keep_open = false;
                        }
                        Err(err) => {
                            let message = surface_error(&err);
                            form.error = Some(message.clone());
                            self.set_status(message, StatusKind::Error);
                        }
                    }
                }
                Err(err) => {
                    let message = err.to_string();
                    form.error = Some(message.clone());
                    self.set_status(message, StatusKind::Error);
                }
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::SchedulingAppointment(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    /// Persist a new patient, then redisplay the full roster: every submit is
    /// one INSERT followed by a full-table SELECT.
    fn save_new_patient(&mut self, form: &PatientForm) -> Result<()> {
        let draft = form.parse_inputs()?;
        create_patient(&self.conn, &draft)?;
        self.refresh_patients()?;
        self.set_status("Patient added successfully.", StatusKind::Info);
        Ok(())
    }

    /// Persist a new doctor and redisplay the roster.
    fn save_new_doctor(&mut self, form: &DoctorForm) -> Result<()> {
        let draft = form.parse_inputs()?;
        create_doctor(&self.conn, &draft)?;
        self.refresh_doctors()?;
        self.set_status("Doctor added.", StatusKind::Info);
        Ok(())
    }

    /// Load the patient roster and switch to the Patients screen.
    fn open_patients(&mut self) -> Result<()> {
        let patients = fetch_patients(&self.conn)?;
        self.screen = Screen::Patients(RosterScreen::new(patients));
        Ok(())
    }

    /// Load the doctor roster and switch to the Doctors screen.
    fn open_doctors(&mut self) -> Result<()> {
        let doctors = fetch_doctors(&self.conn)?;
        self.screen = Screen::Doctors(RosterScreen::new(doctors));
        Ok(())
    }

    /// Load both appointment listings and switch to the Appointments screen.
    fn open_appointments(&mut self) -> Result<()> {
        let joined = fetch_appointments(&self.conn)?;
        let raw = fetch_raw_appointments(&self.conn)?;
        self.screen = Screen::Appointments(AppointmentsScreen::new(joined, raw));
        Ok(())
    }

    /// Fetch the three aggregates and switch to the Reports screen.
    fn open_reports(&mut self) -> Result<()> {
        let totals = Totals {
            patients: count_patients(&self.conn)?,
            doctors: count_doctors(&self.conn)?,
            appointments: count_appointments(&self.conn)?,
        };
        self.screen = Screen::Reports(ReportsScreen::new(totals));
        Ok(())
    }

    /// Re-run the full patient fetch after an insert, if the roster is open.
    fn refresh_patients(&mut self) -> Result<()> {
        if let Screen::Patients(ref mut roster) = self.screen {
            roster.set_rows(fetch_patients(&self.conn)?);
        }
        Ok(())
    }

    /// Re-run the full doctor fetch after an insert.
    fn refresh_doctors(&mut self) -> Result<()> {
        if let Screen::Doctors(ref mut roster) = self.screen {
            roster.set_rows(fetch_doctors(&self.conn)?);
        }
        Ok(())
    }

    /// Re-run both appointment fetches after a booking.
    fn refresh_appointments(&mut self) -> Result<()> {
        if let Screen::Appointments(ref mut appointments) = self.screen {
            let joined = fetch_appointments(&self.conn)?;
            let raw = fetch_raw_appointments(&self.conn)?;
            appointments.set_rows(joined, raw);
        }
        Ok(())
    }

    fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Main render routine invoked each tick. Splits the frame into the
    /// navigation bar, the active screen, and the footer, then layers the
    /// modal form on top when one is open.
    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();

        let content_area = if area.height > TAB_BAR_HEIGHT + FOOTER_HEIGHT {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(TAB_BAR_HEIGHT),
                    Constraint::Min(0),
                    Constraint::Length(FOOTER_HEIGHT),
                ])
                .split(area);
            self.draw_tab_bar(frame, chunks[0]);
            self.draw_footer(frame, chunks[2]);
            chunks[1]
        } else {
            area
        };

        match &self.screen {
            Screen::Patients(roster) => self.draw_patients(frame, content_area, roster),
            Screen::Doctors(roster) => self.draw_doctors(frame, content_area, roster),
            Screen::Appointments(appointments) => {
                self.draw_appointments(frame, content_area, appointments)
            }
            Screen::Reports(reports) => self.draw_reports(frame, content_area, reports),
        }

        match &self.mode {
            Mode::AddingPatient(form) => self.draw_form_modal(
                frame,
                area,
                "Add New Patient",
                form.build_lines(),
                form.error.as_deref(),
                form.cursor(),
                70,
                60,
            ),
            Mode::AddingDoctor(form) => self.draw_form_modal(
                frame,
                area,
                "Register Doctor",
                form.build_lines(),
                form.error.as_deref(),
                form.cursor(),
                60,
                40,
            ),
            Mode::SchedulingAppointment(form) => self.draw_form_modal(
                frame,
                area,
                "Schedule Appointment",
                form.build_lines(),
                form.error.as_deref(),
                form.cursor(),
                70,
                40,
            ),
            Mode::Normal => {}
        }
    }

    /// Render the navigation bar with the active screen highlighted.
    fn draw_tab_bar(&self, frame: &mut Frame, area: Rect) {
        let active = self.screen.tab_index();
        let mut spans = Vec::new();
        for (idx, title) in TAB_TITLES.iter().enumerate() {
            if idx > 0 {
                spans.push(Span::raw("  |  "));
            }
            let label = format!("[{}] {}", idx + 1, title);
            if idx == active {
                spans.push(Span::styled(
                    label,
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ));
            } else {
                spans.push(Span::raw(label));
            }
        }

        let bar = Paragraph::new(Line::from(spans)).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Clinic Records"),
        );
        frame.render_widget(bar, area);
    }

    /// Render the patient roster as scrolling cards.
    fn draw_patients(&self, frame: &mut Frame, area: Rect, roster: &RosterScreen<Patient>) {
        if roster.rows.is_empty() {
            let message = Paragraph::new("No patients yet. Press '+' to add one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Patients"));
            frame.render_widget(message, area);
            return;
        }

        let cards: Vec<(String, Vec<Line>)> = roster
            .rows
            .iter()
            .map(|patient| {
                let title = format!("Patient #{}", patient.id);
                let diagnosis = if patient.diagnosis.trim().is_empty() {
                    "-".to_string()
                } else {
                    patient.diagnosis.clone()
                };
                let contact = if patient.emergency_contact.trim().is_empty() {
                    "-".to_string()
                } else {
                    patient.emergency_contact.clone()
                };
                let lines = vec![
                    Line::from(vec![
                        Span::styled(
                            patient.display_name().to_string(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                        Span::raw(format!("  Age {}, {}", patient.age, patient.gender)),
                    ]),
                    labeled_line("Diagnosis", &diagnosis),
                    labeled_line("Emergency", &contact),
                    labeled_line("Insurance", &patient.insurance_line()),
                ];
                (title, lines)
            })
            .collect();

        self.render_cards(frame, area, cards, roster.selected, PATIENT_CARD_HEIGHT);
    }

    /// Render the doctor roster as scrolling cards.
    fn draw_doctors(&self, frame: &mut Frame, area: Rect, roster: &RosterScreen<Doctor>) {
        if roster.rows.is_empty() {
            let message = Paragraph::new("No doctors yet. Press '+' to register one.")
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).title("Doctors"));
            frame.render_widget(message, area);
            return;
        }

        let cards: Vec<(String, Vec<Line>)> = roster
            .rows
            .iter()
            .map(|doctor| {
                let title = format!("Doctor #{}", doctor.id);
                let specialization = if doctor.specialization.trim().is_empty() {
                    "-".to_string()
                } else {
                    doctor.specialization.clone()
                };
                let lines = vec![
                    Line::from(Span::styled(
                        doctor.display_name().to_string(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    labeled_line("Specialization", &specialization),
                    labeled_line("Experience", &format!("{} years", doctor.experience)),
                ];
                (title, lines)
            })
            .collect();

        self.render_cards(frame, area, cards, roster.selected, DOCTOR_CARD_HEIGHT);
    }

    /// Render either appointment listing. The joined view shows resolved
    /// names; the raw view keeps orphaned references on screen.
    fn draw_appointments(&self, frame: &mut Frame, area: Rect, screen: &AppointmentsScreen) {
        if screen.show_raw {
            self.draw_raw_appointments(frame, area, &screen.raw);
            return;
        }

        if screen.joined.rows.is_empty() {
            let message = Paragraph::new("No appointments scheduled yet. Press '+' to book one.")
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Appointment Records"),
                );
            frame.render_widget(message, area);
            return;
        }

        let cards: Vec<(String, Vec<Line>)> = screen
            .joined
            .rows
            .iter()
            .map(|record| {
                let title = format!("Appt #{}", record.id);
                let lines = vec![
                    Line::from(Span::styled(
                        format!("{} with {}", record.patient, record.doctor),
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    labeled_line("Date", &record.date),
                ];
                (title, lines)
            })
            .collect();

        self.render_cards(
            frame,
            area,
            cards,
            screen.joined.selected,
            APPOINTMENT_CARD_HEIGHT,
        );
    }

    fn draw_raw_appointments(
        &self,
        frame: &mut Frame,
        area: Rect,
        raw: &RosterScreen<Appointment>,
    ) {
        if raw.rows.is_empty() {
            let message = Paragraph::new("No appointment rows in storage.")
                .alignment(Alignment::Center)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Appointments (raw rows)"),
                );
            frame.render_widget(message, area);
            return;
        }

        let cards: Vec<(String, Vec<Line>)> = raw
            .rows
            .iter()
            .map(|row| {
                let title = format!("Appt #{}", row.id);
                let lines = vec![
                    labeled_line(
                        "Refs",
                        &format!("patient {} / doctor {}", row.patient_id, row.doctor_id),
                    ),
                    labeled_line("Date", &row.date),
                    labeled_line("Status", &row.status),
                ];
                (title, lines)
            })
            .collect();

        self.render_cards(frame, area, cards, raw.selected, APPOINTMENT_CARD_HEIGHT);
    }

    /// Render the three aggregate counters side by side.
    fn draw_reports(&self, frame: &mut Frame, area: Rect, reports: &ReportsScreen) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0)])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(33),
                Constraint::Percentage(34),
                Constraint::Percentage(33),
            ])
            .split(chunks[0]);

        let metrics = [
            ("Total Patients", reports.totals.patients),
            ("Total Doctors", reports.totals.doctors),
            ("Appointments", reports.totals.appointments),
        ];

        for (chunk, (title, value)) in columns.iter().zip(metrics) {
            let metric = Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    value.to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
            ])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title));
            frame.render_widget(metric, *chunk);
        }

        let note = Paragraph::new("All records live in a local SQLite file.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(note, chunks[1]);
    }

    /// Shared card renderer: bordered blocks stacked vertically, scrolled so
    /// the selected card stays visible, selection drawn in yellow.
    fn render_cards(
        &self,
        frame: &mut Frame,
        area: Rect,
        cards: Vec<(String, Vec<Line>)>,
        selected: usize,
        card_height: u16,
    ) {
        if cards.is_empty() || area.height == 0 {
            return;
        }

        let capacity = ((area.height / card_height).max(1)) as usize;
        let range = visible_range(selected, capacity, cards.len());

        for (slot, idx) in range.enumerate() {
            let card_area = Rect {
                x: area.x,
                y: area.y + (slot as u16) * card_height,
                width: area.width,
                height: card_height.min(area.height.saturating_sub((slot as u16) * card_height)),
            };
            if card_area.height == 0 {
                continue;
            }

            let (title, lines) = &cards[idx];
            let mut block = Block::default().borders(Borders::ALL).title(title.clone());
            if idx == selected {
                block = block.style(Style::default().fg(Color::Yellow));
            }
            let card = Paragraph::new(lines.clone())
                .block(block)
                .wrap(Wrap { trim: true });
            frame.render_widget(card, card_area);
        }
    }

    /// Render the footer: status message above the key hints.
    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match &self.mode {
            Mode::AddingPatient(_) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[←→]", key_style),
                Span::raw(" Gender   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::AddingDoctor(_) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::SchedulingAppointment(_) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[↑↓]", key_style),
                Span::raw(" Pick   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Book   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Cancel"),
            ]),
            Mode::Normal => match &self.screen {
                Screen::Appointments(_) => Line::from(vec![
                    Span::styled("[1-4]", key_style),
                    Span::raw(" Navigate   "),
                    Span::styled("[↑↓]", key_style),
                    Span::raw(" Select   "),
                    Span::styled("[+]", key_style),
                    Span::raw(" Schedule   "),
                    Span::styled("[t]", key_style),
                    Span::raw(" Raw Rows   "),
                    Span::styled("[q]", key_style),
                    Span::raw(" Quit"),
                ]),
                Screen::Reports(_) => Line::from(vec![
                    Span::styled("[1-4]", key_style),
                    Span::raw(" Navigate   "),
                    Span::styled("[q]", key_style),
                    Span::raw(" Quit"),
                ]),
                _ => Line::from(vec![
                    Span::styled("[1-4]", key_style),
                    Span::raw(" Navigate   "),
                    Span::styled("[↑↓]", key_style),
                    Span::raw(" Select   "),
                    Span::styled("[+]", key_style),
                    Span::raw(" Add   "),
                    Span::styled("[q]", key_style),
                    Span::raw(" Quit"),
                ]),
            },
        }
    }

    /// Draw a modal entry form over the current screen: the field rows, then
    /// an error or hint line, with the cursor parked in the focused field.
    #[allow(clippy::too_many_arguments)]
    fn draw_form_modal(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        mut lines: Vec<Line<'static>>,
        error: Option<&str>,
        cursor: Option<(u16, u16)>,
        percent_x: u16,
        percent_y: u16,
    ) {
        let popup_area = centered_rect(percent_x, percent_y, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        lines.push(Line::from(""));
        if let Some(error) = error {
            lines.push(Line::from(Span::styled(
                error.to_string(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save, Tab to switch fields, Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);

        if let Some((cursor_x, cursor_y)) = cursor {
            frame.set_cursor_position((inner.x + cursor_x, inner.y + cursor_y));
        }
    }
}
