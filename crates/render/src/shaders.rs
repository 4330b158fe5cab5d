use std::fmt;
use std::str::FromStr;

/// GLSL 400 vertex shader: transforms the position by `WVP`, forwards color.
pub const VERTEX_SHADER: &str = r#"#version 400

layout(location=0) in vec4 in_Position;
layout(location=1) in vec4 in_Color;
out vec4 ex_Color;

uniform mat4 WVP;

void main(void)
{
  gl_Position = WVP * in_Position;
  ex_Color = in_Color;
}
"#;

/// GLSL 400 fragment shader: passes the interpolated color through.
pub const FRAGMENT_SHADER: &str = r#"#version 400

in vec4 ex_Color;
out vec4 out_Color;

void main(void)
{
  out_Color = ex_Color;
}
"#;

/// Name of the view-projection uniform in [`VERTEX_SHADER`].
pub const WVP_UNIFORM: &str = "WVP";

/// Attribute location of the position buffer.
pub const POSITION_SLOT: u32 = 0;
/// Attribute location of the color buffer.
pub const COLOR_SLOT: u32 = 1;

/// Shader stage, addressable by its symbolic name (`"vert"` / `"frag"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub const ALL: [ShaderStage; 2] = [ShaderStage::Vertex, ShaderStage::Fragment];

    /// Symbolic lookup name.
    pub fn name(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vert",
            ShaderStage::Fragment => "frag",
        }
    }

    /// Embedded source for this stage.
    pub fn source(self) -> &'static str {
        match self {
            ShaderStage::Vertex => VERTEX_SHADER,
            ShaderStage::Fragment => FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// Returned when a symbolic shader name is not one of the known stages.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown shader name `{0}` (expected `vert` or `frag`)")]
pub struct UnknownShaderName(pub String);

impl FromStr for ShaderStage {
    type Err = UnknownShaderName;

    /// Exact match only: `"vert"` or `"frag"`.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        ShaderStage::ALL
            .into_iter()
            .find(|stage| stage.name() == name)
            .ok_or_else(|| UnknownShaderName(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_exact() {
        assert_eq!("vert".parse::<ShaderStage>(), Ok(ShaderStage::Vertex));
        assert_eq!("frag".parse::<ShaderStage>(), Ok(ShaderStage::Fragment));
        // Names that merely sort after "vert"/"frag" must not resolve.
        assert!("zzz".parse::<ShaderStage>().is_err());
        assert!("vertex".parse::<ShaderStage>().is_err());
        assert!("fragment.glsl".parse::<ShaderStage>().is_err());
        assert!("".parse::<ShaderStage>().is_err());
    }

    #[test]
    fn sources_declare_the_expected_interface() {
        let vert = ShaderStage::Vertex.source();
        assert!(vert.starts_with("#version 400"));
        assert!(vert.contains("layout(location=0) in vec4 in_Position"));
        assert!(vert.contains("layout(location=1) in vec4 in_Color"));
        assert!(vert.contains("uniform mat4 WVP"));

        let frag = ShaderStage::Fragment.source();
        assert!(frag.starts_with("#version 400"));
        assert!(frag.contains("out_Color = ex_Color"));
    }

    #[test]
    fn unknown_name_message() {
        let err = "shader".parse::<ShaderStage>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown shader name `shader` (expected `vert` or `frag`)"
        );
    }
}
