pub(crate) const SHADER: &str = r#"
struct GlobalUniform {
    view_proj: mat4x4<f32>,
    camera_position: vec4<f32>,
    ambient: vec4<f32>,
    // xyz position, w > 0 when the light is present
    point_position: vec4<f32>,
    // xyz color * intensity, w cutoff distance
    point_radiance: vec4<f32>,
    // x decay
    point_params: vec4<f32>,
    spot_position: vec4<f32>,
    // xyz unit direction, w cutoff distance
    spot_direction: vec4<f32>,
    // xyz color * intensity, w decay
    spot_radiance: vec4<f32>,
    // x cos(outer), y cos(inner)
    spot_cone: vec4<f32>,
}

struct ObjectConstants {
    model: mat4x4<f32>,
    normal: mat3x4<f32>,
    // rgb color, a opacity
    color: vec4<f32>,
    // rgb emissive * intensity, a shininess
    emissive: vec4<f32>,
    // x specular enabled, y double sided
    flags: vec4<f32>,
}

@group(0) @binding(0)
var<uniform> globals: GlobalUniform;

@group(1) @binding(0)
var<uniform> object: ObjectConstants;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) world_pos: vec3<f32>,
    @location(1) normal: vec3<f32>,
}

@vertex
fn vs_main(input: VertexInput) -> VertexOutput {
    var out: VertexOutput;
    let world_position = object.model * vec4<f32>(input.position, 1.0);
    out.position = globals.view_proj * world_position;
    out.world_pos = world_position.xyz;

    let world_normal = mat3x3<f32>(
        object.normal[0].xyz,
        object.normal[1].xyz,
        object.normal[2].xyz
    ) * input.normal;

    out.normal = normalize(world_normal);
    return out;
}

fn attenuation(dist: f32, cutoff: f32, decay: f32) -> f32 {
    var falloff = 1.0 / max(pow(max(dist, 0.01), decay), 0.01);
    if cutoff > 0.0 {
        let ratio = dist / cutoff;
        let fade = clamp(1.0 - ratio * ratio * ratio * ratio, 0.0, 1.0);
        falloff = falloff * fade * fade;
    }
    return falloff;
}

fn shade(normal: vec3<f32>, view_dir: vec3<f32>, light_dir: vec3<f32>, radiance: vec3<f32>) -> vec3<f32> {
    let diffuse = max(dot(normal, light_dir), 0.0) * object.color.rgb;
    var specular = vec3<f32>(0.0);
    if object.flags.x > 0.5 {
        let half_dir = normalize(light_dir + view_dir);
        specular = vec3<f32>(pow(max(dot(normal, half_dir), 0.0), max(object.emissive.a, 1.0)));
    }
    return (diffuse + specular) * radiance;
}

@fragment
fn fs_main(input: VertexOutput) -> @location(0) vec4<f32> {
    let view_dir = normalize(globals.camera_position.xyz - input.world_pos);
    var normal = normalize(input.normal);
    if object.flags.y > 0.5 && dot(normal, view_dir) < 0.0 {
        normal = -normal;
    }

    var lit = globals.ambient.rgb * object.color.rgb;

    if globals.point_position.w > 0.0 {
        let to_light = globals.point_position.xyz - input.world_pos;
        let dist = length(to_light);
        let light_dir = to_light / max(dist, 0.0001);
        let falloff = attenuation(dist, globals.point_radiance.w, globals.point_params.x);
        lit = lit + shade(normal, view_dir, light_dir, globals.point_radiance.rgb * falloff);
    }

    if globals.spot_position.w > 0.0 {
        let to_light = globals.spot_position.xyz - input.world_pos;
        let dist = length(to_light);
        let light_dir = to_light / max(dist, 0.0001);
        let angle_cos = dot(-light_dir, globals.spot_direction.xyz);
        let cos_outer = globals.spot_cone.x;
        let cos_inner = globals.spot_cone.y;
        var cone = 0.0;
        if cos_inner - cos_outer > 0.0001 {
            cone = smoothstep(cos_outer, cos_inner, angle_cos);
        } else if angle_cos >= cos_outer {
            cone = 1.0;
        }
        let falloff = attenuation(dist, globals.spot_direction.w, globals.spot_radiance.w);
        lit = lit + shade(normal, view_dir, light_dir, globals.spot_radiance.rgb * falloff * cone);
    }

    let color = max(lit + object.emissive.rgb, vec3<f32>(0.0));
    return vec4<f32>(color, object.color.a);
}
"#;
