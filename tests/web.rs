#![cfg(target_arch = "wasm32")]

use realms_viz::{LightningLogo, LogoOptions, NucleusBackground};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;
use web_sys::{HtmlCanvasElement, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

fn element<T: JsCast>(tag: &str) -> T {
    let document = web_sys::window().unwrap().document().unwrap();
    let elem = document.create_element(tag).unwrap();
    document.body().unwrap().append_child(&elem).unwrap();
    elem.dyn_into::<T>().unwrap()
}

fn container(width: u32, height: u32) -> HtmlElement {
    let div: HtmlElement = element("div");
    let style = div.style();
    style.set_property("width", &format!("{width}px")).unwrap();
    style.set_property("height", &format!("{height}px")).unwrap();
    div
}

#[wasm_bindgen_test]
fn logo_fills_its_container() {
    let host = container(640, 160);
    let canvas: HtmlCanvasElement = element("canvas");
    host.append_child(&canvas).unwrap();

    let mut logo = LightningLogo::mount(host, canvas.clone(), None).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (640, 160));
    assert_eq!((logo.width(), logo.height()), (640, 160));
    assert!(logo.is_running());

    logo.strike(100.0, 50.0);
    logo.strike_random();
    logo.unmount();
    logo.unmount();
    assert!(!logo.is_running());
}

#[wasm_bindgen_test]
fn explicit_options_win_over_the_container() {
    let host = container(640, 160);
    let canvas: HtmlCanvasElement = element("canvas");
    let mut options = LogoOptions::new();
    options.set_text("AB".into());
    options.set_width(300);
    options.set_color("#fff").unwrap();
    assert!(options.set_color("purple").is_err());

    let logo = LightningLogo::mount(host, canvas.clone(), Some(options)).unwrap();
    assert_eq!((canvas.width(), canvas.height()), (300, 160));
    drop(logo);
}

#[wasm_bindgen_test]
fn nucleus_mounts_and_unmounts() {
    let canvas: HtmlCanvasElement = element("canvas");
    canvas.style().set_property("width", "200px").unwrap();
    canvas.style().set_property("height", "100px").unwrap();

    // headless browsers without WebGL2 hand back an inert handle
    let mut background = NucleusBackground::mount(canvas).unwrap();
    background.unmount();
    background.unmount();
    assert!(!background.is_running());
}
