//! Test fixtures and constants.

/// Template ids shipped in the embedded styles.json
pub mod templates {
    pub const NATURE: &str = "nature";
    pub const ELSEVIER: &str = "elsevier";
    pub const UNKNOWN: &str = "no_such_journal";
}

/// matplotlib's default color cycle, first three entries
pub mod tab10 {
    pub const BLUE: &str = "#1f77b4";
    pub const ORANGE: &str = "#ff7f0e";
    pub const GREEN: &str = "#2ca02c";
}

/// A figure as written by matplotlib's SVG backend: metadata creator,
/// a stylesheet, a full-canvas white background and DejaVu fonts.
pub const MATPLOTLIB_SVG: &str = r##"<?xml version="1.0" encoding="utf-8" standalone="no"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN"
  "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<svg xmlns:xlink="http://www.w3.org/1999/xlink" width="640pt" height="480pt" viewBox="0 0 640 480" xmlns="http://www.w3.org/2000/svg" version="1.1">
 <metadata>
  <rdf:RDF xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:cc="http://creativecommons.org/ns#" xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#">
   <cc:Work>
    <dc:type rdf:resource="http://purl.org/dc/dcmitype/StillImage"/>
    <dc:creator>
     <cc:Agent>
      <dc:title>Matplotlib v3.8.0, https://matplotlib.org/</dc:title>
     </cc:Agent>
    </dc:creator>
   </cc:Work>
  </rdf:RDF>
 </metadata>
 <defs>
  <style type="text/css">*{stroke-linejoin: round; stroke-linecap: butt}
.DejaVu{font-family: DejaVu Sans}</style>
 </defs>
 <g id="figure_1">
  <g id="patch_1">
   <path d="M 0 480 L 640 480 L 640 0 L 0 0 z" style="fill: #ffffff"/>
   <rect x="0" y="0" width="640" height="480" style="fill: #ffffff"/>
  </g>
  <g id="axes_1">
   <g id="patch_2">
    <rect x="80" y="57.6" width="496" height="369.6" style="fill: #ffffff"/>
   </g>
   <path d="M 80 400 L 200 300 L 320 250" style="fill: none; stroke: #1f77b4; stroke-width: 1.5"/>
   <path d="M 80 380 L 200 320 L 320 200" style="fill: none; stroke: #ff7f0e; stroke-width: 1.5"/>
   <path d="M 80 360 L 200 340 L 320 150" style="fill: none; stroke: #1f77b4; stroke-width: 1.5"/>
   <circle cx="200" cy="300" r="3" fill="#2ca02c"/>
   <text x="320" y="460" class="DejaVu" style="font-size: 10px">Time (s)</text>
   <text x="20" y="240" style="font: 10px 'DejaVu Sans'; fill: #262626">Amplitude</text>
  </g>
 </g>
</svg>
"##;

/// A hand-drawn figure with no matplotlib fingerprints.
pub const PLAIN_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="200" height="100">
  <rect x="10" y="10" width="50" height="50" fill="#ff0000"/>
  <circle cx="120" cy="40" r="20" style="fill:#0000ff;stroke:black"/>
  <text x="10" y="90" font-family="Georgia">Legend</text>
</svg>
"##;

/// Colors only, spread over style and attribute forms.
pub const SVG_WITH_COLORS: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100">
  <rect width="10" height="10" fill="#ff0000"/>
  <rect width="10" height="10" fill="red"/>
  <rect width="10" height="10" style="fill: rgb(255, 0, 0)"/>
  <rect width="10" height="10" fill="#00f"/>
  <rect width="10" height="10" fill="#808080" stroke="#000000"/>
  <rect width="10" height="10" fill="url(#gradient)" stroke="none"/>
</svg>
"##;

/// Not well-formed XML.
pub const BROKEN_SVG: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\"><g></svg>";
