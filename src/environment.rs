use std::fmt;
use std::str::FromStr;

use ndarray::Array2;
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};

use crate::error::{Error, Result};

/// Occupancy tag of a single grid cell.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Obstacle,
    Agent,
    Target,
}

impl Cell {
    pub fn tag(&self) -> char {
        match self {
            Cell::Empty => '0',
            Cell::Obstacle => '1',
            Cell::Agent => 'A',
            Cell::Target => 'T',
        }
    }
}

// Action
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Movement {
    Up,
    Right,
    Down,
    Left,
}

impl Movement {
    pub const ALL: [Movement; 4] = [Movement::Up, Movement::Down, Movement::Left, Movement::Right];

    pub fn into_vector(self) -> (isize, isize) {
        match self {
            Movement::Up    => (-1, 0),
            Movement::Down  => ( 1, 0),
            Movement::Left  => ( 0,-1),
            Movement::Right => ( 0, 1),
        }
    }
}

impl Distribution<Movement> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Movement {
        match rng.gen_range(0..4) {
            0 => Movement::Up,
            1 => Movement::Right,
            2 => Movement::Down,
            _ => Movement::Left,
        }
    }
}

impl FromStr for Movement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "up" => Ok(Movement::Up),
            "down" => Ok(Movement::Down),
            "left" => Ok(Movement::Left),
            "right" => Ok(Movement::Right),
            other => Err(Error::UnknownDirection(other.to_owned())),
        }
    }
}

/// Grid coordinate; row 0 is the top edge.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    fn index(self) -> [usize; 2] {
        [self.row, self.col]
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// What a single call to [`GridWorld::step`] did.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Episode already finished; nothing changed.
    Idle,
    /// Candidate cell holds an obstacle; the agent stays put.
    Blocked,
    /// The agent stepped onto the target.
    Reached,
    /// Plain step, including moves clamped at an edge.
    Moved,
}

impl StepOutcome {
    pub const IDLE_REWARD: f64 = 0.0;
    pub const BLOCKED_REWARD: f64 = -1.0;
    pub const REACHED_REWARD: f64 = 1.0;
    pub const STEP_REWARD: f64 = -0.01;

    pub fn reward(&self) -> f64 {
        match self {
            StepOutcome::Idle => Self::IDLE_REWARD,
            StepOutcome::Blocked => Self::BLOCKED_REWARD,
            StepOutcome::Reached => Self::REACHED_REWARD,
            StepOutcome::Moved => Self::STEP_REWARD,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridConfig {
    pub size: usize,
    /// Carry obstacles over when the grid is reset between episodes.
    pub keep_obstacles: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 5,
            keep_obstacles: true,
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<()> {
        if self.size < 2 {
            return Err(Error::InvalidSize { size: self.size });
        }
        Ok(())
    }
}

/// Square grid with one agent travelling from the bottom-left corner to the
/// target in the top-right corner.
#[derive(Debug, Clone)]
pub struct GridWorld {
    grid: Array2<Cell>,
    size: usize,
    agent: Pos,
    target: Pos,
    finished: bool,
    keep_obstacles: bool,
}

impl GridWorld {
    pub fn new(config: GridConfig) -> Result<Self> {
        config.validate()?;
        let size = config.size;
        let mut env = Self {
            grid: Array2::from_elem((size, size), Cell::Empty),
            size,
            agent: Pos::new(size - 1, 0),
            target: Pos::new(0, size - 1),
            finished: false,
            keep_obstacles: config.keep_obstacles,
        };
        env.reset();
        Ok(env)
    }

    /// Rebuilds the grid and puts the agent back on the start corner.
    ///
    /// Obstacles survive only when the world was built with
    /// `keep_obstacles`; otherwise every reset starts from an empty board.
    pub fn reset(&mut self) {
        let mut grid = Array2::from_elem((self.size, self.size), Cell::Empty);
        if self.keep_obstacles {
            for pos in self.obstacles() {
                grid[pos.index()] = Cell::Obstacle;
            }
        }

        self.agent = self.start_pos();
        self.target = Pos::new(0, self.size - 1);
        grid[self.agent.index()] = Cell::Agent;
        grid[self.target.index()] = Cell::Target;
        self.grid = grid;
        self.finished = false;
    }

    /// Marks `pos` as an obstacle if the cell is empty.
    ///
    /// Returns whether the obstacle was placed. Agent, target and existing
    /// obstacle cells are left alone.
    pub fn add_obstacle(&mut self, pos: Pos) -> Result<bool> {
        let size = self.size;
        let cell = self
            .grid
            .get_mut(pos.index())
            .ok_or(Error::OutOfBounds { pos, size })?;
        if *cell != Cell::Empty {
            return Ok(false);
        }
        *cell = Cell::Obstacle;
        tracing::debug!(%pos, "obstacle placed");
        Ok(true)
    }

    /// Applies `movement` and returns the reward.
    pub fn move_agent(&mut self, movement: Movement) -> f64 {
        self.step(Some(movement)).reward()
    }

    /// Textual variant of [`GridWorld::move_agent`]. Unrecognised names do not
    /// move the agent and cost the usual step penalty.
    pub fn move_agent_named(&mut self, direction: &str) -> f64 {
        self.step(direction.parse().ok()).reward()
    }

    /// `None` behaves like a move into a wall: the candidate is the current
    /// position.
    pub fn step(&mut self, movement: Option<Movement>) -> StepOutcome {
        if self.finished {
            return StepOutcome::Idle;
        }

        let candidate = match movement {
            Some(movement) => {
                let (new_pos, wall_hit) = self.check_movement(self.agent, movement.into_vector());
                if wall_hit {
                    tracing::trace!(pos = %self.agent, ?movement, "move clamped at edge");
                }
                new_pos
            }
            None => self.agent,
        };

        let cell = self.grid[candidate.index()];
        match cell {
            Cell::Obstacle => StepOutcome::Blocked,
            Cell::Target => {
                // the target tag stays; the agent is absorbed into it
                self.grid[self.agent.index()] = Cell::Empty;
                self.agent = candidate;
                self.finished = true;
                StepOutcome::Reached
            }
            Cell::Empty | Cell::Agent => {
                self.grid[self.agent.index()] = Cell::Empty;
                self.agent = candidate;
                self.grid[self.agent.index()] = Cell::Agent;
                StepOutcome::Moved
            }
        }
    }

    fn check_movement(&self, pos: Pos, movement_vec: (isize, isize)) -> (Pos, bool) {
        let bound = self.size as isize;
        let mut new_row = pos.row as isize + movement_vec.0;
        let mut new_col = pos.col as isize + movement_vec.1;
        let mut wall_hit = false;

        if new_row < 0 {
            new_row = 0;
            wall_hit = true;
        } else if new_row >= bound {
            new_row = bound - 1;
            wall_hit = true;
        }
        if new_col < 0 {
            new_col = 0;
            wall_hit = true;
        } else if new_col >= bound {
            new_col = bound - 1;
            wall_hit = true;
        }

        (Pos::new(new_row as usize, new_col as usize), wall_hit)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn start_pos(&self) -> Pos {
        Pos::new(self.size - 1, 0)
    }

    pub fn target_pos(&self) -> Pos {
        self.target
    }

    pub fn agent_pos(&self) -> Pos {
        self.agent
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn cell(&self, pos: Pos) -> Option<Cell> {
        self.grid.get(pos.index()).copied()
    }

    pub fn obstacles(&self) -> Vec<Pos> {
        self.grid
            .indexed_iter()
            .filter(|(_, cell)| **cell == Cell::Obstacle)
            .map(|((row, col), _)| Pos::new(row, col))
            .collect()
    }
}

impl fmt::Display for GridWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.grid.rows() {
            let line: Vec<String> = row.iter().map(|cell| cell.tag().to_string()).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
