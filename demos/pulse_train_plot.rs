//! Plot the output pin for a few notes played through the simulated interrupter
//!
//! The first note runs in pulse-width mode, the second in duty-cycle mode, then the note is released. The plot is
//! written to `pulse_train_plot.png` in the current directory.
//!
//! Requires plotters lib: https://docs.rs/plotters/latest/plotters/.

use midi_interrupter::{
    config::{OutputMode, PulseConfig},
    interrupter::Interrupter,
    lookup::CalibrationTable,
    lookup_tables::F_CPU_HZ,
    sim::{self, SimBoard, SimClock},
};
use plotters::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let clock = SimClock::new();

    let mut config = PulseConfig::default();
    config.set_pulse_width(200.into()); // microseconds, capped per note
    config.set_duty(8.into()); // 8/32 of the period, used once we switch modes

    let mut intr = Interrupter::new(CalibrationTable::default(), sim::board(&clock), config);
    intr.init();

    // C5 in pulse-width mode
    send(&mut intr, &[0x90, 72, 100]);
    for _ in 0..4 {
        run_period(&mut intr, &clock);
    }

    // E5 in duty-cycle mode, retuned without a note-off in between
    config.set_mode(OutputMode::DutyCycle);
    intr.set_config(config);
    send(&mut intr, &[0x90, 76, 100]);
    for _ in 0..4 {
        run_period(&mut intr, &clock);
    }

    // release, then let some silence go by
    send(&mut intr, &[0x80, 76, 0]);
    clock.advance_ns(2_000_000);

    let end_ms = clock.now_ns() as f32 / 1e6;

    // turn the recorded edges into a step plot
    let mut points = vec![(0.0_f32, 0.0_f32)];
    let mut level = 0.0_f32;
    for edge in intr.hardware().output.edges() {
        let t = edge.at_ns as f32 / 1e6;
        points.push((t, level));
        level = edge.high as u32 as f32;
        points.push((t, level));
    }
    points.push((end_ms, level));

    let root = BitMapBackend::new("pulse_train_plot.png", (1024, 320)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Interrupter output", ("Arial", 20).into_font())
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0f32..end_ms, -0.1f32..1.1f32)?;

    chart
        .configure_mesh()
        .x_desc("Time (ms)")
        .y_desc("Output")
        .draw()?;

    chart
        .draw_series(LineSeries::new(points, RED))?
        .label("Output pin")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;

    Ok(())
}

// `send(i, bytes)` feeds each byte to the interrupter as if it came from the UART
fn send(intr: &mut Interrupter<CalibrationTable<'static>, SimBoard<'_>>, bytes: &[u8]) {
    for b in bytes {
        intr.on_byte_received(*b);
    }
}

// `run_period(i, c)` delivers both frequency timer interrupts for one period and advances the clock to the next one
fn run_period(intr: &mut Interrupter<CalibrationTable<'static>, SimBoard<'_>>, clock: &SimClock) {
    let Some(program) = intr.hardware().frequency_timer.program() else {
        return;
    };
    let start = clock.now_ns();

    intr.on_frequency_compare();
    let duty_at = start + program.duty_ns(F_CPU_HZ);
    clock.advance_ns(duty_at.saturating_sub(clock.now_ns()));

    intr.on_duty_compare();
    let end = start + program.period_ns(F_CPU_HZ);
    clock.advance_ns(end.saturating_sub(clock.now_ns()));
}
