use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

const DEFAULT_NAMESPACE: &str = "minecraft";

const AIR_IDS: [&str; 3] = ["minecraft:air", "minecraft:cave_air", "minecraft:void_air"];
const WATER_ID: &str = "minecraft:water";
const LAVA_ID: &str = "minecraft:lava";

// Blocks that always contain water even without a `waterlogged` property.
const ALWAYS_WATERLOGGED_IDS: [&str; 5] = [
    "minecraft:seagrass",
    "minecraft:tall_seagrass",
    "minecraft:kelp",
    "minecraft:kelp_plant",
    "minecraft:bubble_column",
];

static AIR: LazyLock<BlockState> = LazyLock::new(|| BlockState::new("minecraft:air"));
static WATER: LazyLock<BlockState> =
    LazyLock::new(|| BlockState::with_properties("minecraft:water", [("level", "0")]));

/// Immutable identity of a voxel: namespaced id plus a sorted property set.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BlockState {
    id: String,
    properties: BTreeMap<String, String>,
    full_id: String,
    is_air: bool,
    is_water: bool,
    is_waterlogged: bool,
}

impl BlockState {
    pub fn new(id: &str) -> Self {
        Self::with_properties::<_, &str, &str>(id, [])
    }

    pub fn with_properties<I, K, V>(id: &str, properties: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let id = if id.contains(':') {
            id.to_string()
        } else {
            format!("{DEFAULT_NAMESPACE}:{id}")
        };
        let properties: BTreeMap<String, String> = properties
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let full_id = if properties.is_empty() {
            id.clone()
        } else {
            let props: Vec<String> = properties.iter().map(|(k, v)| format!("{k}={v}")).collect();
            format!("{}[{}]", id, props.join(","))
        };
        let is_air = AIR_IDS.contains(&id.as_str());
        let is_water = id == WATER_ID;
        let is_waterlogged = properties.get("waterlogged").is_some_and(|v| v == "true");
        Self {
            id,
            properties,
            full_id,
            is_air,
            is_water,
            is_waterlogged,
        }
    }

    /// Returns a copy of this state with `key` set to `value`.
    pub fn with_property(&self, key: &str, value: &str) -> Self {
        let mut props = self.properties.clone();
        props.insert(key.to_string(), value.to_string());
        Self::with_properties(&self.id, props)
    }

    /// The plain `minecraft:air` state.
    pub fn air() -> &'static BlockState {
        &AIR
    }

    /// Still water source, used to render the water inside waterlogged blocks.
    pub fn water() -> &'static BlockState {
        &WATER
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Id plus properties, e.g. `minecraft:water[level=3]`.
    #[inline]
    pub fn full_id(&self) -> &str {
        &self.full_id
    }

    #[inline]
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    #[inline]
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(|s| s.as_str())
    }

    #[inline]
    pub fn is_air(&self) -> bool {
        self.is_air
    }

    #[inline]
    pub fn is_water(&self) -> bool {
        self.is_water
    }

    #[inline]
    pub fn is_waterlogged(&self) -> bool {
        self.is_waterlogged
    }

    #[inline]
    pub fn is_liquid(&self) -> bool {
        self.is_water || self.id == LAVA_ID
    }

    /// Liquid fullness from the `level` property. Missing or unparsable
    /// values read as level 0.
    pub fn liquid_level(&self) -> i32 {
        self.property("level")
            .and_then(|s| s.parse::<i32>().ok())
            .unwrap_or(0)
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_id)
    }
}

impl FromStr for BlockState {
    type Err = String;

    /// Parses `namespace:id[key=value,...]`; the namespace and property list are optional.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (id, props) = match s.find('[') {
            Some(open) => {
                let body = s[open + 1..]
                    .strip_suffix(']')
                    .ok_or_else(|| format!("unterminated property list in '{s}'"))?;
                (&s[..open], body)
            }
            None => (s, ""),
        };
        if id.is_empty() {
            return Err(format!("missing block id in '{s}'"));
        }
        let mut properties = Vec::new();
        for pair in props.split(',').filter(|p| !p.trim().is_empty()) {
            let (k, v) = pair
                .split_once('=')
                .ok_or_else(|| format!("property '{pair}' is not key=value"))?;
            properties.push((k.trim().to_string(), v.trim().to_string()));
        }
        Ok(BlockState::with_properties(id, properties))
    }
}

/// Resource-pack derived rendering flags of a block state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BlockProperties {
    /// Hides faces of neighbors pressed against this block.
    pub culling: bool,
    /// Darkens vertices of neighboring faces (ambient occlusion).
    pub occluding: bool,
    pub always_waterlogged: bool,
}

impl BlockProperties {
    pub const NONE: BlockProperties = BlockProperties {
        culling: false,
        occluding: false,
        always_waterlogged: false,
    };
    pub const SOLID: BlockProperties = BlockProperties {
        culling: true,
        occluding: true,
        always_waterlogged: false,
    };

    /// Properties for states that have no explicit entry in the model catalog.
    pub fn defaults_for(state: &BlockState) -> BlockProperties {
        if state.is_air() || state.is_liquid() {
            BlockProperties::NONE
        } else if ALWAYS_WATERLOGGED_IDS.contains(&state.id()) {
            BlockProperties {
                always_waterlogged: true,
                ..BlockProperties::NONE
            }
        } else {
            BlockProperties::SOLID
        }
    }
}
