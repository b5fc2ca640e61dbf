mod no_subtour;

pub use no_subtour::*;
