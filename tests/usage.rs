//! Usage lines and the command listing.

use easel::cli::commands::summaries;
use easel::{default_registry, Config};

#[test]
fn test_builtin_usage() {
    let registry = default_registry(&Config::default()).unwrap();
    let lines: Vec<String> = summaries(&registry).into_iter().map(|s| s.usage).collect();

    insta::assert_snapshot!(lines.join("\n"), @r"
    $createCanvas[width: number, height: number, code?: script]
    $addArcLayer[x: number, y: number, radius: number, color: colour, filled?: boolean, stroke?: number, id?: string, outlineName?: string, startAngle?: number, endAngle?: number]
    $addCircleLayer[x: number, y: number, radius: number, color: colour, filled?: boolean, stroke?: number, id?: string, outlineName?: string]
    $addEllipseImageLayer[x: number, y: number, width: number, height: number, radius: number, url: string, id?: string, outlineName?: string]
    $addEllipseLayer[x: number, y: number, width: number, height: number, radius: number, color: colour, filled?: boolean, stroke?: number, id?: string, outlineName?: string]
    $addTextLayer[x: number, y: number, fontName: string, fontSize: number, color: colour, text: string, align?: string, id?: string]
    $createOutline[id: string, type: string, color?: colour, alpha?: number, stroke?: number]
    $loadFont[family: string, path: string, weight?: string]
    $renderCanvas[path: string]
    $getVar[name: string]
    $setVar[name: string, value?: unknown]
    ");
}

#[test]
fn test_command_listing_json() {
    let registry = default_registry(&Config::default()).unwrap();
    let summaries = summaries(&registry);
    let render = summaries
        .iter()
        .find(|s| s.name == "$renderCanvas")
        .unwrap();

    insta::assert_json_snapshot!(render, @r#"
    {
      "name": "$renderCanvas",
      "parent": "$createCanvas",
      "usage": "$renderCanvas[path: string]",
      "description": "Renders the canvas to a PNG file."
    }
    "#);
}
