pub const FULLSCREEN_VERTEX: &str = r#"#version 300 es
precision highp float;
layout(location=0) in vec2 a_pos;
out vec2 v_uv;
void main(){
  v_uv = a_pos * 0.5 + 0.5;
  gl_Position = vec4(a_pos, 0.0, 1.0);
}
"#;

/// Raymarched nucleus. `iMouse.w` (right button) is uploaded but unused.
pub const NUCLEUS_FRAGMENT: &str = r#"#version 300 es
precision highp float;

out vec4 fragColor;
in vec2 v_uv;

uniform vec3  iResolution;   // (w, h, dpr)
uniform float iTime;
uniform int   iFrame;
uniform vec4  iMouse;

void mainImage(out vec4 color, in vec2 fragCoord)
{
  vec2  r  = iResolution.xy;
  float t  = iTime;
  vec3  fc = vec3(fragCoord, t);
  vec4  o  = vec4(0.0);

  vec3 p, a;
  float z = 0.0;
  float d = 0.0;

  for (float i = 0.0; i < 100.0; i++)
  {
    p = z * normalize(fc * 2.0 - r.xyy);
    a = normalize(cos(vec3(4.0, 2.0, 0.0) + t - d * 10.0));
    p.z += 8.0;
    a = a * dot(a, p) - cross(a, p);
    for (float k = 1.0; k < 5.0; k += 1.0) {
      a += sin(a * k + t).yzx / k;
    }
    d = abs(length(a) - 5.0) / 6.0;
    z += d;
    o += vec4(3.0, 8.0, z, 0.0) / max(d, 1e-4) / 9e4;
  }

  color = vec4(o.rgb, 1.0);
}

void main(){ mainImage(fragColor, gl_FragCoord.xy); }
"#;

/// Three vertices covering clip space; the overhang is clipped.
pub const FULLSCREEN_TRIANGLE: [f32; 6] = [-1.0, -1.0, 3.0, -1.0, -1.0, 3.0];
