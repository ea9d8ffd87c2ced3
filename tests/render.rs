// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use image::Rgb;
use mandelbrot_set::{
    evaluate, ColorPolicy, Divergence, FrameSweep, Formula, IterationConfig, Pixel, PlaneWindow,
    PpmSink, Preset, Renderer, ScanParameters, Seed, SweepRule,
};
use num::Complex;

fn small(preset: Preset, width: usize, height: usize) -> Renderer {
    let job = preset.job().unwrap();
    let scan = ScanParameters::new(width, height, job.scan.window())
        .unwrap()
        .with_projection(job.scan.projection());
    Renderer::new(scan, job.config, job.policy)
}

fn render_bytes(renderer: &Renderer, threads: usize) -> Vec<u8> {
    let mut sink = PpmSink::new(Vec::new());
    renderer.render_frame_threaded(&mut sink, threads).unwrap();
    sink.into_inner()
}

#[test]
fn every_inside_pixel_of_the_banded_render_is_black() {
    let renderer = small(Preset::Plain, 48, 48);
    let job = Preset::Plain.job().unwrap();
    let scan = renderer.scan();
    for y in 0..scan.height() {
        for x in 0..scan.width() {
            let point = scan.pixel_to_point(&Pixel(x, y)).unwrap();
            let result = evaluate(point, &job.config);
            if result.iterations == job.config.max_iterations() {
                assert_eq!(renderer.shade(&Pixel(x, y)), Rgb([0, 0, 0]));
            }
        }
    }
}

#[test]
fn presets_render_identically_twice() {
    for preset in &[Preset::Classic, Preset::Swipecat, Preset::SwipecatDisk] {
        let renderer = small(*preset, 20, 16);
        assert_eq!(render_bytes(&renderer, 1), render_bytes(&renderer, 1));
        assert_eq!(render_bytes(&renderer, 1), render_bytes(&renderer, 3));
    }
}

#[test]
fn ppm_output_decodes_to_the_shaded_pixels() {
    let renderer = small(Preset::Swipecat, 12, 10);
    let decoded = image::load_from_memory(&render_bytes(&renderer, 2))
        .unwrap()
        .to_rgb8();
    for (x, y, pixel) in decoded.enumerate_pixels() {
        assert_eq!(*pixel, renderer.shade(&Pixel(x as usize, y as usize)));
    }
}

#[test]
fn zoom_into_the_set_goes_dark() {
    let window = PlaneWindow::around(Complex::new(-0.1, 0.0), 2.0, 2.0).unwrap();
    let mut renderer = Renderer::new(
        ScanParameters::new(10, 10, window).unwrap(),
        IterationConfig::new(Formula::Quadratic, Divergence::Modulus(4.0), 100)
            .unwrap()
            .seeded_at(Seed::Origin),
        ColorPolicy::banded(64, 4).unwrap(),
    );
    let sweep = FrameSweep {
        frames: 6,
        rule: SweepRule::zoom(&window, 0.5),
    };
    let mut sink = PpmSink::new(Vec::new());
    renderer.render_sweep(&sweep, &mut sink, 1).unwrap();
    let bytes = sink.into_inner();
    // The last frame is a window 1/8 wide around a cardioid point.
    let last = &bytes[bytes.len() - 10 * 10 * 3..];
    assert!(last.iter().all(|b| *b == 0));
}

#[test]
fn zoom_frames_match_windows_built_from_the_fixed_center() {
    let job = Preset::Zoom.job().unwrap();
    let (center, factor) = match job.sweep.rule {
        SweepRule::Zoom { center, factor, .. } => (center, factor),
        other => panic!("unexpected {:?}", other),
    };
    let mut renderer = small(Preset::Zoom, 8, 8);
    let mut sink = PpmSink::new(Vec::new());
    renderer.render_sweep(&job.sweep, &mut sink, 1).unwrap();
    let bytes = sink.into_inner();
    let frame_len = b"P6\n8 8\n255\n".len() + 8 * 8 * 3;
    assert_eq!(bytes.len(), job.sweep.frames * frame_len);

    let mut half = 3.0;
    let mut compared = 0;
    for (n, frame) in bytes.chunks(frame_len).enumerate() {
        // Once the window is narrower than an f64 can resolve, `around`
        // refuses it and the sweep collapses it onto the centre.
        let window = match PlaneWindow::around(center, half, half) {
            Ok(window) => {
                compared += 1;
                window
            }
            Err(_) => PlaneWindow::focused(center, half, half).unwrap(),
        };
        let scan = ScanParameters::new(8, 8, window).unwrap();
        let fresh = Renderer::new(scan, job.config, job.policy);
        assert_eq!(frame, &render_bytes(&fresh, 1)[..], "frame {}", n);
        half *= factor;
    }
    assert!(compared > 700);

    let body = &bytes[bytes.len() - 8 * 8 * 3..];
    assert!(body.chunks(3).all(|pixel| pixel == &body[..3]));
    let last = renderer.scan().window();
    assert_eq!((last.x_min, last.x_max), (center.re, center.re));
    assert_eq!((last.y_min, last.y_max), (center.im, center.im));
}
