//! Synthesis regression test
//!
//! Tests sheet synthesis against the sample layout:
//!   1. Identical inputs give byte-identical encodings in both formats
//!   2. Different seeds give different sheets once accuracy < 1
//!   3. Registration marks and filled bubbles land where the layout says
//!   4. Decision rates follow the accuracy knob
//!   5. Layout/key mismatches are rejected before rendering
//!   6. Extreme but finite shear renders a blank-rowed sheet

use sheetscan_core::{Canvas, Point};
use sheetscan_io::{ImageFormat, encode};
use sheetscan_synth::{FillDecision, SynthError, SynthOptions, synthesize};
use sheetscan_test::RegParams;
use sheetscan_test::fixtures::{
    TEST_DPI, sample_layout, sample_order, single_question_layout, single_question_order,
};

fn dark_at(canvas: &Canvas, p: Point) -> bool {
    canvas
        .pixel_at(p.x.round() as i64, p.y.round() as i64)
        .is_some_and(|v| v < 128)
}

#[test]
fn synth_reg() {
    let mut rp = RegParams::new("synth");
    let layout = sample_layout(TEST_DPI);
    let order = sample_order();

    // --- Test 1: determinism ---
    let opts = SynthOptions::new()
        .with_student("123")
        .with_accuracy(0.7)
        .with_noise(20)
        .with_rotation(1.0)
        .with_skew(0.01)
        .with_seed(77);
    let a = synthesize(&layout, &order, &opts).expect("synthesize a");
    let b = synthesize(&layout, &order, &opts).expect("synthesize b");
    for format in [ImageFormat::Sparse, ImageFormat::Pgm] {
        let ea = encode(&a.canvas, format).unwrap();
        let eb = encode(&b.canvas, format).unwrap();
        rp.compare_strings(&ea, &eb);
        rp.write_output(&ea, format.extension()).unwrap();
    }
    rp.compare_values(1.0, if a.truth == b.truth { 1.0 } else { 0.0 }, 0.0);

    // --- Test 2: seeds matter ---
    let c = synthesize(&layout, &order, &opts.clone().with_seed(78)).unwrap();
    rp.compare_values(1.0, if c.canvas != a.canvas { 1.0 } else { 0.0 }, 0.0);

    // --- Test 3: geometry of a clean sheet ---
    let clean = synthesize(
        &layout,
        &order,
        &SynthOptions::new().with_student("456").with_accuracy(1.0),
    )
    .unwrap();
    rp.compare_values(1.0, if clean.truth.version_id == "B" { 1.0 } else { 0.0 }, 0.0);
    for mark in &layout.registration_marks {
        let hit = dark_at(&clean.canvas, mark.center_px(TEST_DPI));
        rp.compare_values(1.0, if hit { 1.0 } else { 0.0 }, 0.0);
    }
    for q in &layout.questions {
        let entry = clean.truth.entry(&q.question_id).unwrap();
        for f in &q.answer_fields {
            let filled = dark_at(&clean.canvas, f.center_px(TEST_DPI));
            let expected = entry.expected_answer.as_deref() == Some(f.label.as_str());
            rp.compare_values(
                if expected { 1.0 } else { 0.0 },
                if filled { 1.0 } else { 0.0 },
                0.0,
            );
        }
    }

    // --- Test 4: accuracy knob ---
    let mut correct = 0usize;
    let mut total = 0usize;
    for seed in 0..200 {
        let sheet = synthesize(
            &layout,
            &order,
            &SynthOptions::new()
                .with_student("123")
                .with_accuracy(0.6)
                .with_seed(seed),
        )
        .unwrap();
        for e in &sheet.truth.answers {
            total += 1;
            if e.decision == FillDecision::Correct {
                correct += 1;
            }
        }
    }
    let rate = correct as f64 / total as f64;
    eprintln!("  correct rate at accuracy 0.6: {rate:.3}");
    rp.compare_values(0.6, rate, 0.06);

    // --- Test 5: rejected inputs ---
    let bad_student = synthesize(
        &layout,
        &order,
        &SynthOptions::new().with_student("12").with_version("A"),
    );
    rp.compare_values(
        1.0,
        if matches!(bad_student, Err(SynthError::InvalidIdentifier { field: "student_id", .. })) {
            1.0
        } else {
            0.0
        },
        0.0,
    );
    let unassigned = synthesize(&layout, &order, &SynthOptions::new().with_student("999"));
    rp.compare_values(
        1.0,
        if matches!(unassigned, Err(SynthError::UnknownVersion(_))) {
            1.0
        } else {
            0.0
        },
        0.0,
    );
    let bad_version_grid = synthesize(
        &layout,
        &order.clone().with_version(sheetscan_core::VersionOrder {
            version_id: "E".into(),
            questions: order.version("A").unwrap().questions.clone(),
        }),
        &SynthOptions::new().with_version("E"),
    );
    rp.compare_values(
        1.0,
        if matches!(bad_version_grid, Err(SynthError::InvalidIdentifier { field: "version_id", .. })) {
            1.0
        } else {
            0.0
        },
        0.0,
    );

    // --- Test 6: extreme shear ---
    let single = single_question_layout(100);
    let plain = synthesize(
        &single,
        &single_question_order("A"),
        &SynthOptions::new().with_accuracy(1.0),
    )
    .expect("synthesize unsheared");
    for skew in [-1e30, 1e30] {
        let sheared = synthesize(
            &single,
            &single_question_order("A"),
            &SynthOptions::new().with_accuracy(1.0).with_skew(skew),
        );
        match sheared {
            Ok(sheet) => {
                rp.compare_values(plain.canvas.width() as f64, sheet.canvas.width() as f64, 0.0);
                let dark = sheet.canvas.data().iter().filter(|&&v| v < 128).count();
                let plain_dark = plain.canvas.data().iter().filter(|&&v| v < 128).count();
                rp.compare_values(1.0, if dark < plain_dark { 1.0 } else { 0.0 }, 0.0);
            }
            Err(e) => {
                eprintln!("  skew {skew}: {e}");
                rp.compare_values(1.0, 0.0, 0.0);
            }
        }
    }

    assert!(rp.cleanup());
}
